#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use folio::data::results::row_from_values;
    use folio::data::{
        DataColumnSchema, MemoryQuery, ParameterInfo, ParameterValue, Query, QueryColumnInfo,
        QueryError, QueryResults, SortingRule, StructureError, Value, ValueType,
    };

    fn schemas() -> Vec<Arc<DataColumnSchema>> {
        vec![
            Arc::new(DataColumnSchema::new("Region", ValueType::Text)),
            Arc::new(DataColumnSchema::new("Amount", ValueType::Integer)),
        ]
    }

    fn columns(schemas: &[Arc<DataColumnSchema>]) -> Vec<QueryColumnInfo> {
        schemas.iter().map(|s| QueryColumnInfo::new((**s).clone())).collect()
    }

    #[test]
    fn test_with_data_keeps_rows_and_columns() {
        let schemas = schemas();
        let rows = vec![
            row_from_values(&schemas, vec!["West".into(), 30.into()]),
            row_from_values(&schemas, vec!["East".into(), 10.into()]),
        ];

        let results = QueryResults::builder("Sales", 12)
            .with_data(columns(&schemas), rows)
            .unwrap();

        assert!(results.success());
        assert_eq!(results.query_name(), "Sales");
        assert_eq!(results.execution_time_ms(), 12);
        assert_eq!(results.columns().len(), 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].value("amount"), Some(&Value::Integer(10)));
        assert!(results.error_messages().is_empty());
    }

    #[test]
    fn test_with_data_rejects_ragged_rows() {
        let schemas = schemas();
        let rows = vec![
            row_from_values(&schemas, vec!["West".into(), 30.into()]),
            row_from_values(&schemas[..1], vec!["East".into()]),
        ];

        let error = QueryResults::builder("Sales", 0)
            .with_data(columns(&schemas), rows)
            .unwrap_err();

        assert_eq!(
            error,
            StructureError::CellCountMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        insta::assert_snapshot!(error.to_string(), @"row 1: 2 cells were expected, but 1 were found");
    }

    #[test]
    fn test_with_data_rejects_duplicate_columns() {
        let schemas = schemas();
        let mut columns = columns(&schemas);
        columns.push(QueryColumnInfo::new(DataColumnSchema::new("REGION", ValueType::Text)));

        let error = QueryResults::builder("Sales", 0)
            .with_data(columns, Vec::new())
            .unwrap_err();

        assert_eq!(error, StructureError::DuplicateColumn("REGION".to_string()));
    }

    #[test]
    fn test_with_data_requires_columns() {
        let error = QueryResults::builder("Sales", 0)
            .with_data(Vec::new(), Vec::new())
            .unwrap_err();

        insta::assert_snapshot!(error.to_string(), @"at least one column is required to populate the data");
    }

    #[test]
    fn test_failed_results_summarise_errors() {
        let results = QueryResults::builder("Sales", 3)
            .failed()
            .with_error("E1", "timeout")
            .with_error("E2", "retry limit reached")
            .without_data();

        assert!(!results.success());
        assert!(results.is_empty());
        insta::assert_snapshot!(results.error_summary(), @"E1: timeout; E2: retry limit reached");
    }

    fn sales() -> MemoryQuery {
        MemoryQuery::new(
            "Sales",
            vec![
                DataColumnSchema::new("Region", ValueType::Text),
                DataColumnSchema::new("Amount", ValueType::Integer),
            ],
        )
        .with_parameter(ParameterInfo::new("Region", ValueType::Text).required())
        .with_row(vec!["West".into(), 30.into()])
        .with_row(vec!["East".into(), 10.into()])
        .with_row(vec!["West".into(), 20.into()])
    }

    #[tokio::test]
    async fn test_memory_query_filters_and_sorts() {
        let query = sales().sort_column(SortingRule::asc("Amount"));

        let results = query
            .execute(&[ParameterValue::new("region", "West")])
            .await
            .unwrap();

        let amounts: Vec<_> = results.iter().map(|r| r.value("Amount").cloned().unwrap()).collect();
        assert_eq!(amounts, vec![Value::Integer(20), Value::Integer(30)]);
    }

    #[tokio::test]
    async fn test_memory_query_requires_parameters() {
        let error = sales().execute(&[]).await.unwrap_err();

        assert_eq!(
            error,
            QueryError::MissingParameter {
                query: "Sales".to_string(),
                parameter: "Region".to_string(),
            }
        );
    }
}
