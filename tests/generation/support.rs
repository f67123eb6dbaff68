//! Mock queries and generators shared by the generation tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use folio::components::{
    Component, ComponentDefinition, ComponentGenerator, ComponentKind, GeneratorRegistry,
};
use folio::data::results::row_from_values;
use folio::data::{
    DataColumnSchema, GroupingRule, ParameterInfo, ParameterValue, Query, QueryColumnInfo,
    QueryError, QueryResult, QueryResults, SortingRule, Value, ValueType,
};
use folio::error::GenerationResult;
use folio::filter::ReportFilter;
use folio::report::SectionType;

/// How a [`MockQuery`] behaves when executed.
#[derive(Debug, Clone)]
pub enum Behavior {
    Rows(Vec<Vec<Value>>),
    /// `execute` returns an error.
    Error(String),
    /// `execute` succeeds with a result flagged as failed.
    Unsuccessful(String),
    /// `execute` succeeds with results that carry no data.
    NoData,
}

/// Tracks how many mock queries are executing at once.
#[derive(Debug, Default)]
pub struct Concurrency {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Concurrency {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockQuery {
    name: String,
    schemas: Vec<Arc<DataColumnSchema>>,
    columns: Vec<QueryColumnInfo>,
    parameters: Vec<ParameterInfo>,
    behavior: Behavior,
    delay: Duration,
    concurrency: Option<Arc<Concurrency>>,
    received: Mutex<Vec<Vec<ParameterValue>>>,
}

impl MockQuery {
    pub fn new(name: &str, columns: &[(&str, ValueType)], behavior: Behavior) -> Self {
        let schemas: Vec<Arc<DataColumnSchema>> = columns
            .iter()
            .map(|(n, t)| Arc::new(DataColumnSchema::new(*n, *t)))
            .collect();
        let columns = schemas
            .iter()
            .map(|s| QueryColumnInfo::new((**s).clone()))
            .collect();

        Self {
            name: name.to_string(),
            schemas,
            columns,
            parameters: Vec::new(),
            behavior,
            delay: Duration::ZERO,
            concurrency: None,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn tracked(mut self, concurrency: Arc<Concurrency>) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Parameter values of every execution so far.
    pub fn received(&self) -> Vec<Vec<ParameterValue>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Query for MockQuery {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_source(&self) -> &str {
        "mock"
    }

    fn columns(&self) -> &[QueryColumnInfo] {
        &self.columns
    }

    fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    fn sorting_rules(&self) -> &[SortingRule] {
        &[]
    }

    fn grouping_rules(&self) -> &[GroupingRule] {
        &[]
    }

    async fn execute(&self, values: &[ParameterValue]) -> QueryResult<QueryResults> {
        self.received.lock().unwrap().push(values.to_vec());

        if let Some(c) = &self.concurrency {
            let now = c.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            c.peak.fetch_max(now, Ordering::SeqCst);
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(c) = &self.concurrency {
            c.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        match &self.behavior {
            Behavior::Rows(rows) => {
                let rows = rows
                    .iter()
                    .map(|values| row_from_values(&self.schemas, values.clone()))
                    .collect();
                QueryResults::builder(self.name.clone(), self.delay.as_millis() as u64)
                    .with_data(self.columns.clone(), rows)
                    .map_err(|source| QueryError::Malformed {
                        query: self.name.clone(),
                        source,
                    })
            }
            Behavior::Error(message) => Err(QueryError::execution(self.name.clone(), message.clone())),
            Behavior::Unsuccessful(message) => Ok(QueryResults::builder(self.name.clone(), 0)
                .failed()
                .with_error("E001", message.clone())
                .without_data()),
            Behavior::NoData => Ok(QueryResults::builder(self.name.clone(), 0).without_data()),
        }
    }
}

/// A separator generator that always panics.
#[derive(Debug)]
pub struct PanickingGenerator;

#[async_trait]
impl ComponentGenerator for PanickingGenerator {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Separator
    }

    async fn generate(
        &self,
        _definition: &ComponentDefinition,
        _section: SectionType,
        _filter: &ReportFilter,
    ) -> GenerationResult<Component> {
        panic!("separator exploded");
    }
}

pub fn panicking_registry() -> Arc<GeneratorRegistry> {
    Arc::new(GeneratorRegistry::with_defaults().register(Arc::new(PanickingGenerator)))
}

/// Region/Customer/Amount sales rows.
pub fn sales_rows() -> Vec<Vec<Value>> {
    vec![
        vec!["West".into(), "A".into(), 30.into()],
        vec!["East".into(), "B".into(), 10.into()],
        vec!["West".into(), "C".into(), 20.into()],
        vec!["East".into(), "D".into(), 40.into()],
    ]
}

pub fn sales_query(name: &str) -> MockQuery {
    MockQuery::new(
        name,
        &[
            ("Region", ValueType::Text),
            ("Customer", ValueType::Text),
            ("Amount", ValueType::Integer),
        ],
        Behavior::Rows(sales_rows()),
    )
}
