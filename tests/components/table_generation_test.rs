#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use folio::components::{
        ActionDefinition, ColumnAlignment, Component, ComponentAttributes, ComponentDefinition,
        ComponentGenerator, TableColumnDefinition, TableDefinition, TableGenerator,
    };
    use folio::data::{
        AggregateFunction, DataBinding, DataColumnSchema, GroupingRule, MemoryQuery, SortDirection,
        SortingRule, Value, ValueType,
    };
    use folio::filter::ReportFilter;
    use folio::report::SectionType;

    fn sales() -> Arc<MemoryQuery> {
        Arc::new(
            MemoryQuery::new(
                "Sales",
                vec![
                    DataColumnSchema::new("Region", ValueType::Text),
                    DataColumnSchema::new("Customer", ValueType::Text),
                    DataColumnSchema::new("Amount", ValueType::Integer),
                ],
            )
            .with_rows(vec![
                vec!["West".into(), "A".into(), 30.into()],
                vec!["East".into(), "B".into(), 10.into()],
                vec!["West".into(), "C".into(), 20.into()],
                vec!["East".into(), "D".into(), 40.into()],
                vec!["North".into(), "E".into(), 10.into()],
            ]),
        )
    }

    fn definition() -> ComponentDefinition {
        TableDefinition::new(ComponentAttributes::new("Sales", "Sales by region"), sales())
            .with_column(TableColumnDefinition::bound("Region"))
            .with_column(
                TableColumnDefinition::bound("Customer").with_cell_action(ActionDefinition::navigate(
                    DataBinding::template("/customers/{Customer}"),
                )),
            )
            .with_column(
                TableColumnDefinition::bound("Amount")
                    .aligned(ColumnAlignment::Right)
                    .with_total(AggregateFunction::Sum),
            )
            .into()
    }

    async fn generate(filter: &ReportFilter) -> Component {
        TableGenerator
            .generate(&definition(), SectionType::ReportBody, filter)
            .await
            .unwrap()
    }

    fn column(component: &Component, name: &str) -> Vec<String> {
        component
            .as_table()
            .unwrap()
            .iter()
            .map(|row| row.value(name).unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_rows_follow_query_order_without_rules() {
        let component = generate(&ReportFilter::new()).await;

        assert_eq!(column(&component, "Customer"), vec!["A", "B", "C", "D", "E"]);
        assert!(component.as_table().unwrap().groupings.is_empty());
    }

    #[tokio::test]
    async fn test_sort_is_stable_for_equal_keys() {
        let filter = ReportFilter::new().with_sorting_rule(None, "Sales", SortingRule::asc("Amount"));
        let component = generate(&filter).await;

        assert_eq!(column(&component, "Customer"), vec!["B", "E", "C", "A", "D"]);
    }

    #[tokio::test]
    async fn test_multi_key_sort() {
        let filter = ReportFilter::new()
            .with_sorting_rule(Some(SectionType::ReportBody), "Sales", SortingRule::asc("Region"))
            .with_sorting_rule(None, "Sales", SortingRule::desc("Amount"));
        let component = generate(&filter).await;

        assert_eq!(column(&component, "Customer"), vec!["D", "B", "E", "A", "C"]);
    }

    #[tokio::test]
    async fn test_rules_for_other_sections_are_ignored() {
        let filter = ReportFilter::new().with_sorting_rule(
            Some(SectionType::ReportFooter),
            "Sales",
            SortingRule::desc("Amount"),
        );
        let component = generate(&filter).await;

        assert_eq!(column(&component, "Customer"), vec!["A", "B", "C", "D", "E"]);
    }

    #[tokio::test]
    async fn test_cells_carry_resolved_actions() {
        let component = generate(&ReportFilter::new()).await;
        let table = component.as_table().unwrap();

        let customer = table[1].cell("Customer").unwrap();
        assert_eq!(customer.action.as_ref().unwrap().destination, "/customers/B");
        assert_eq!(customer.column.title, "Customer");
        assert!(table[1].cell("Region").unwrap().action.is_none());
        assert_eq!(table.columns[2].alignment, ColumnAlignment::Right);
    }

    #[tokio::test]
    async fn test_grouping_with_totals() {
        let filter = ReportFilter::new().with_grouping_rule(
            None,
            "Sales",
            GroupingRule::new("Region", SortDirection::Ascending),
        );
        let component = generate(&filter).await;
        let table = component.as_table().unwrap();

        let regions: Vec<_> = table
            .groupings
            .iter()
            .map(|g| g.grouping_values[0].value.to_string())
            .collect();
        assert_eq!(regions, vec!["East", "North", "West"]);

        let east = &table.groupings[0];
        assert_eq!(east.grouping_values[0].column, "Region");
        assert_eq!(east.len(), 2);
        assert_eq!(east.totals.as_ref().unwrap()[2].value, Value::Integer(50));
        assert_eq!(east.totals.as_ref().unwrap()[0].value, Value::Null);

        assert_eq!(table.totals.as_ref().unwrap()[2].value, Value::Integer(110));
        assert_eq!(table.len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_sort_column_fails() {
        let filter = ReportFilter::new().with_sorting_rule(None, "Sales", SortingRule::asc("Discount"));
        let error = TableGenerator
            .generate(&definition(), SectionType::ReportBody, &filter)
            .await
            .unwrap_err();

        insta::assert_snapshot!(error.to_string(), @"no cell matches the column 'Discount'");
    }

    #[tokio::test]
    async fn test_query_parameter_filters_rows() {
        let query = Arc::new(
            MemoryQuery::new(
                "Sales",
                vec![
                    DataColumnSchema::new("Region", ValueType::Text),
                    DataColumnSchema::new("Customer", ValueType::Text),
                ],
            )
            .with_parameter(folio::data::ParameterInfo::new("Region", ValueType::Text))
            .with_row(vec!["West".into(), "A".into()])
            .with_row(vec!["East".into(), "B".into()]),
        );
        let definition: ComponentDefinition =
            TableDefinition::new(ComponentAttributes::new("Sales", "Sales"), query)
                .with_column(TableColumnDefinition::bound("Customer"))
                .into();
        let filter = ReportFilter::new().with_query_parameter("Sales", "Region", "East");

        let component = TableGenerator
            .generate(&definition, SectionType::ReportBody, &filter)
            .await
            .unwrap();

        assert_eq!(column(&component, "Customer"), vec!["B"]);
    }
}
