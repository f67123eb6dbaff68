mod support;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use folio::components::{
        ComponentAttributes, ReportComponent, SeparatorDefinition, SeparatorStyle,
        TableColumnDefinition, TableDefinition,
    };
    use folio::config::GenerationSettings;
    use folio::data::{ParameterInfo, SortingRule, Value, ValueType};
    use folio::filter::ReportFilter;
    use folio::report::{ReportDefinition, ReportGenerator, SectionDefinition, SectionType};

    use super::support::{panicking_registry, sales_query, Behavior, Concurrency, MockQuery};

    fn table(name: &str, query: Arc<MockQuery>) -> TableDefinition {
        TableDefinition::new(ComponentAttributes::new(name, name), query)
            .with_column(TableColumnDefinition::bound("Region"))
            .with_column(TableColumnDefinition::bound("Customer"))
            .with_column(TableColumnDefinition::bound("Amount"))
    }

    fn section(section_type: SectionType, components: Vec<TableDefinition>) -> SectionDefinition {
        components
            .into_iter()
            .fold(SectionDefinition::new(section_type, section_type.as_str()), |s, c| {
                s.with_component(c).unwrap()
            })
    }

    fn customers(report: &folio::Report, section: SectionType, component: &str) -> Vec<String> {
        report
            .section(section)
            .and_then(|s| s.component(component))
            .and_then(|c| c.as_table())
            .unwrap()
            .iter()
            .map(|row| row.value("Customer").unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_report_keeps_names_and_section_layout() {
        let definition = ReportDefinition::new("sales", "Sales Report")
            .with_description("Quarterly sales")
            .with_section(section(
                SectionType::ReportHeader,
                vec![table("Summary", Arc::new(sales_query("Summary")))],
            ))
            .with_section(section(
                SectionType::ReportBody,
                vec![
                    table("Orders", Arc::new(sales_query("Orders"))),
                    table("Returns", Arc::new(sales_query("Returns"))),
                ],
            ));

        let result = ReportGenerator::new().generate(Arc::new(definition), None).await;

        assert!(result.success());
        assert!(result.error_messages().is_empty());

        let report = result.into_payload().unwrap();
        assert_eq!(report.name, "sales");
        assert_eq!(report.title, "Sales Report");
        assert_eq!(report.description.as_deref(), Some("Quarterly sales"));
        assert!(report.page_header.is_none());
        assert!(report.report_footer.is_none());
        assert!(report.page_footer.is_none());

        let body = report.body.as_ref().unwrap();
        let names: Vec<_> = body.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["Orders", "Returns"]);
        assert_eq!(body.component("Orders").unwrap().as_table().unwrap().len(), 4);

        assert_eq!(report.report_header.as_ref().unwrap().len(), 1);
        assert_eq!(report.sections().count(), 2);
    }

    #[tokio::test]
    async fn test_sections_run_concurrently() {
        let concurrency = Arc::new(Concurrency::default());
        let slow = |name: &str| {
            Arc::new(sales_query(name).with_delay(Duration::from_millis(50)).tracked(concurrency.clone()))
        };

        let definition = ReportDefinition::new("sales", "Sales")
            .with_section(section(SectionType::ReportHeader, vec![table("Header", slow("Header"))]))
            .with_section(section(SectionType::ReportFooter, vec![table("Footer", slow("Footer"))]));

        let result = ReportGenerator::new().generate(Arc::new(definition), None).await;

        assert!(result.success());
        assert_eq!(concurrency.peak(), 2);
    }

    #[tokio::test]
    async fn test_body_failure_fails_the_report() {
        let broken = Arc::new(MockQuery::new(
            "Broken",
            &[("Region", ValueType::Text)],
            Behavior::Error("connection reset".to_string()),
        ));

        let definition = ReportDefinition::new("sales", "Sales")
            .with_section(section(
                SectionType::ReportHeader,
                vec![table("Summary", Arc::new(sales_query("Summary")))],
            ))
            .with_section(section(
                SectionType::ReportBody,
                vec![
                    table("Orders", Arc::new(sales_query("Orders"))),
                    TableDefinition::new(ComponentAttributes::new("Broken", "Broken"), broken)
                        .with_column(TableColumnDefinition::bound("Region")),
                ],
            ));

        let result = ReportGenerator::new().generate(Arc::new(definition), None).await;

        assert!(!result.success());
        assert!(result.payload().is_none());

        let errors = result.error_messages();
        assert_eq!(errors.len(), 1);
        insta::assert_snapshot!(errors["Broken"], @"query 'Broken' failed: connection reset");
    }

    #[tokio::test]
    async fn test_errors_from_every_failed_section_are_reported() {
        let failing = |name: &str| {
            Arc::new(MockQuery::new(
                name,
                &[("Region", ValueType::Text)],
                Behavior::Unsuccessful("timeout".to_string()),
            ))
        };

        let definition = ReportDefinition::new("sales", "Sales")
            .with_section(section(SectionType::PageHeader, vec![table("Logo", failing("Logo"))]))
            .with_section(section(SectionType::ReportBody, vec![table("Orders", failing("Orders"))]));

        let result = ReportGenerator::new().generate(Arc::new(definition), None).await;

        assert!(!result.success());
        let names: Vec<_> = result.error_messages().keys().cloned().collect();
        assert_eq!(names, vec!["Logo", "Orders"]);
        assert!(result.error_messages()["Orders"].contains("reported failure"));
    }

    #[tokio::test]
    async fn test_filter_sorting_applies_end_to_end() {
        let definition = ReportDefinition::new("sales", "Sales").with_section(section(
            SectionType::ReportBody,
            vec![
                table("Orders", Arc::new(sales_query("Orders"))),
                table("Unsorted", Arc::new(sales_query("Unsorted"))),
            ],
        ));
        let filter = ReportFilter::new()
            .with_sorting_rule(None, "Orders", SortingRule::asc("Region"))
            .with_sorting_rule(None, "Orders", SortingRule::desc("Amount"));

        let result = ReportGenerator::new()
            .generate(Arc::new(definition), Some(filter))
            .await;
        let report = result.into_payload().unwrap();

        assert_eq!(customers(&report, SectionType::ReportBody, "Orders"), vec!["D", "B", "A", "C"]);
        assert_eq!(customers(&report, SectionType::ReportBody, "Unsorted"), vec!["A", "B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_default_filter_used_without_filter() {
        let query = Arc::new(
            sales_query("Orders").with_parameter(ParameterInfo::new("Region", ValueType::Text).with_default("East")),
        );
        let definition = ReportDefinition::new("sales", "Sales").with_section(section(
            SectionType::ReportBody,
            vec![table("Orders", query.clone())],
        ));

        let result = ReportGenerator::new().generate(Arc::new(definition), None).await;
        let report = result.into_payload().unwrap();

        assert_eq!(report.filter.parameters.len(), 1);
        assert_eq!(report.filter.parameters[0].query, "Orders");
        assert_eq!(report.filter.parameters[0].value, Value::from("East"));

        let received = query.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0][0].name, "Region");
        assert_eq!(received[0][0].value, Value::from("East"));
    }

    #[tokio::test]
    async fn test_panicking_generator_becomes_error() {
        let definition = ReportDefinition::new("sales", "Sales").with_section(
            SectionDefinition::new(SectionType::ReportBody, "Body")
                .with_component(table("Orders", Arc::new(sales_query("Orders"))))
                .unwrap()
                .with_component(SeparatorDefinition::new(
                    ComponentAttributes::new("Rule", ""),
                    SeparatorStyle::Line,
                ))
                .unwrap(),
        );

        let result = ReportGenerator::with_registry(panicking_registry())
            .generate(Arc::new(definition), None)
            .await;

        assert!(!result.success());
        insta::assert_snapshot!(result.error_messages()["Rule"], @"generation panicked: separator exploded");
    }

    #[tokio::test]
    async fn test_default_no_data_message_comes_from_settings() {
        let definition = ReportDefinition::new("sales", "Sales").with_section(section(
            SectionType::ReportBody,
            vec![table("Orders", Arc::new(sales_query("Orders")))],
        ));
        let settings = GenerationSettings {
            default_no_data_message: Some("Nothing here".to_string()),
            ..GenerationSettings::default()
        };

        let result = ReportGenerator::new()
            .with_settings(settings)
            .generate(Arc::new(definition), None)
            .await;
        let report = result.into_payload().unwrap();
        let orders = report.body.as_ref().unwrap().component("Orders").unwrap();

        assert_eq!(orders.no_data_message(), Some("Nothing here"));
    }

    fn sales_report(query: MockQuery) -> Arc<ReportDefinition> {
        Arc::new(ReportDefinition::new("sales", "Sales").with_section(
            SectionDefinition::new(SectionType::ReportBody, "Body")
                .with_component(table("Orders", Arc::new(query)))
                .unwrap(),
        ))
    }

    #[test]
    fn test_generate_blocking_drives_timer_queries() {
        let definition = sales_report(sales_query("Orders").with_delay(Duration::from_millis(10)));

        let result = ReportGenerator::new().generate_blocking(definition, None);

        assert!(result.success());
        let report = result.into_payload().unwrap();
        assert_eq!(report.body.unwrap().component("Orders").unwrap().as_table().unwrap().len(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_generate_blocking_inside_multi_thread_runtime() {
        let definition = sales_report(sales_query("Orders").with_delay(Duration::from_millis(10)));

        let result = ReportGenerator::new().generate_blocking(definition, None);

        assert!(result.success());
    }

    #[tokio::test]
    async fn test_generate_blocking_inside_current_thread_runtime_fails() {
        let result = ReportGenerator::new().generate_blocking(sales_report(sales_query("Orders")), None);

        assert!(!result.success());
        insta::assert_snapshot!(
            result.error_messages()["runtime"],
            @"cannot block inside a current-thread tokio runtime"
        );
    }

    #[test]
    fn test_generate_blocking_without_runtime() {
        let query = Arc::new(
            folio::data::MemoryQuery::new(
                "Tags",
                vec![folio::data::DataColumnSchema::new("Tag", ValueType::Text)],
            )
            .with_row(vec!["rust".into()])
            .with_row(vec!["async".into()]),
        );
        let definition = ReportDefinition::new("tags", "Tags").with_section(
            SectionDefinition::new(SectionType::ReportBody, "Body")
                .with_component(
                    TableDefinition::new(ComponentAttributes::new("Tags", "Tags"), query)
                        .with_column(TableColumnDefinition::bound("Tag")),
                )
                .unwrap(),
        );

        let result = ReportGenerator::new().generate_blocking(Arc::new(definition), None);

        assert!(result.success());
        let report = result.into_payload().unwrap();
        assert_eq!(report.body.unwrap().component("Tags").unwrap().as_table().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_report_without_components() {
        let definition = ReportDefinition::new("empty", "Empty")
            .with_section(SectionDefinition::new(SectionType::ReportBody, "Body"));

        let result = ReportGenerator::new().generate(Arc::new(definition), None).await;

        assert!(result.success());
        assert_eq!(result.into_payload().unwrap().sections().count(), 0);
    }
}
