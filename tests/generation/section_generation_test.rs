mod support;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use folio::components::{
        ComponentAttributes, ReportComponent, RepeaterDefinition, TableColumnDefinition,
        TableDefinition,
    };
    use folio::data::{DataBinding, ParameterInfo, Value, ValueType};
    use folio::filter::ReportFilter;
    use folio::report::{ReportDefinition, ReportGenerator, SectionDefinition, SectionType};

    use super::support::{sales_query, Behavior, Concurrency, MockQuery};

    fn table(name: &str, query: Arc<MockQuery>) -> TableDefinition {
        TableDefinition::new(ComponentAttributes::new(name, name), query)
            .with_column(TableColumnDefinition::bound("Customer"))
            .with_column(TableColumnDefinition::bound("Amount"))
    }

    fn body(components: Vec<TableDefinition>) -> ReportDefinition {
        let section = components
            .into_iter()
            .fold(SectionDefinition::new(SectionType::ReportBody, "Body"), |s, c| {
                s.with_component(c).unwrap()
            });
        ReportDefinition::new("sales", "Sales").with_section(section)
    }

    #[tokio::test]
    async fn test_components_run_concurrently() {
        let concurrency = Arc::new(Concurrency::default());
        let slow = |name: &str| {
            Arc::new(sales_query(name).with_delay(Duration::from_millis(50)).tracked(concurrency.clone()))
        };
        let definition = body(vec![table("First", slow("First")), table("Second", slow("Second"))]);

        let result = ReportGenerator::new()
            .generate_section(&definition, SectionType::ReportBody, &ReportFilter::new())
            .await
            .unwrap();

        assert!(result.success());
        assert_eq!(concurrency.peak(), 2);
    }

    #[tokio::test]
    async fn test_components_keep_declaration_order() {
        let definition = body(vec![
            table("Slow", Arc::new(sales_query("Slow").with_delay(Duration::from_millis(30)))),
            table("Fast", Arc::new(sales_query("Fast"))),
        ]);

        let result = ReportGenerator::new()
            .generate_section(&definition, SectionType::ReportBody, &ReportFilter::new())
            .await
            .unwrap();
        let section = result.into_payload().unwrap();

        assert_eq!(section.title, "Body");
        assert_eq!(section.section_type, SectionType::ReportBody);
        let names: Vec<_> = section.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Slow", "Fast"]);
    }

    #[tokio::test]
    async fn test_generated_component_keeps_name_and_size() {
        let attributes = ComponentAttributes::new("Orders", "Orders")
            .with_relative_size(50.0, Some(25.0))
            .unwrap();
        let definition = body(vec![TableDefinition::new(attributes, Arc::new(sales_query("Orders")))
            .with_column(TableColumnDefinition::bound("Customer"))]);

        let result = ReportGenerator::new()
            .generate_section(&definition, SectionType::ReportBody, &ReportFilter::new())
            .await
            .unwrap();
        let section = result.into_payload().unwrap();
        let orders = &section.components[0];

        assert_eq!(orders.name(), "Orders");
        assert_eq!(orders.relative_width(), Some(50.0));
        assert_eq!(orders.relative_height(), Some(25.0));
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_component() {
        let failing = Arc::new(MockQuery::new(
            "Failing",
            &[("Customer", ValueType::Text), ("Amount", ValueType::Integer)],
            Behavior::Error("boom".to_string()),
        ));
        let healthy = Arc::new(sales_query("Healthy"));
        let definition = body(vec![table("Failing", failing), table("Healthy", healthy.clone())]);

        let result = ReportGenerator::new()
            .generate_section(&definition, SectionType::ReportBody, &ReportFilter::new())
            .await
            .unwrap();

        assert!(!result.success());
        assert!(result.payload().is_none());
        assert_eq!(result.error_messages().len(), 1);
        insta::assert_snapshot!(result.error_messages()["Failing"], @"query 'Failing' failed: boom");

        // the healthy component still ran to completion
        assert_eq!(healthy.received().len(), 1);
    }

    #[tokio::test]
    async fn test_absent_or_empty_section_yields_nothing() {
        let definition = body(vec![table("Orders", Arc::new(sales_query("Orders")))])
            .with_section(SectionDefinition::new(SectionType::ReportFooter, "Footer"));
        let generator = ReportGenerator::new();
        let filter = ReportFilter::new();

        assert!(generator
            .generate_section(&definition, SectionType::PageHeader, &filter)
            .await
            .is_none());
        assert!(generator
            .generate_section(&definition, SectionType::ReportFooter, &filter)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_section_scoped_parameter_wins() {
        let query = Arc::new(sales_query("Orders").with_parameter(ParameterInfo::new("Region", ValueType::Text)));
        let definition = body(vec![table("Orders", query.clone())]);
        let filter = ReportFilter::new()
            .with_query_parameter("Orders", "Region", "West")
            .with_parameter(SectionType::ReportBody, "Orders", "Region", "East");

        ReportGenerator::new()
            .generate_section(&definition, SectionType::ReportBody, &filter)
            .await
            .unwrap();

        let received = query.received();
        assert_eq!(received[0].len(), 1);
        assert_eq!(received[0][0].value, Value::from("East"));
    }

    #[tokio::test]
    async fn test_results_without_columns_fail_the_component() {
        let query = Arc::new(MockQuery::new("Tags", &[("Tag", ValueType::Text)], Behavior::NoData));
        let repeater = RepeaterDefinition::new(
            ComponentAttributes::new("Tags", "Tags"),
            query,
            DataBinding::column("Tag"),
        );
        let definition = ReportDefinition::new("tags", "Tags").with_section(
            SectionDefinition::new(SectionType::ReportBody, "Body")
                .with_component(repeater)
                .unwrap(),
        );

        let result = ReportGenerator::new()
            .generate_section(&definition, SectionType::ReportBody, &ReportFilter::new())
            .await
            .unwrap();

        assert!(!result.success());
        insta::assert_snapshot!(
            result.error_messages()["Tags"],
            @"query 'Tags' reported failure: query reported failure without error messages"
        );
    }

    #[tokio::test]
    async fn test_empty_repeater_is_not_an_error() {
        let query = Arc::new(MockQuery::new("Tags", &[("Tag", ValueType::Text)], Behavior::Rows(vec![])));
        let repeater = RepeaterDefinition::new(
            ComponentAttributes::new("Tags", "Tags"),
            query,
            DataBinding::column("Tag"),
        );
        let definition = ReportDefinition::new("tags", "Tags").with_section(
            SectionDefinition::new(SectionType::ReportBody, "Body")
                .with_component(repeater)
                .unwrap(),
        );

        let result = ReportGenerator::new()
            .generate_section(&definition, SectionType::ReportBody, &ReportFilter::new())
            .await
            .unwrap();
        let section = result.into_payload().unwrap();
        let component = section.component("Tags").unwrap();

        assert!(component.as_repeater().unwrap().is_empty());
        assert_eq!(component.no_data_message(), Some("No data to display."));
    }
}
