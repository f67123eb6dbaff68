//! Report components: definitions, generated values and their generators.
//!
//! Every component kind contributes three things:
//!
//! ```text
//! ┌──────────────────────┐   generate()   ┌──────────────────────┐
//! │ ComponentDefinition  │ ─────────────► │ Component            │
//! │ (author-time, query  │  (strategy per │ (immutable, rows and │
//! │  refs + bindings)    │   kind)        │  items resolved)     │
//! └──────────────────────┘                └──────────────────────┘
//! ```
//!
//! The [`GeneratorRegistry`] maps each [`ComponentKind`] to the
//! [`ComponentGenerator`] that implements it.

pub mod action;
pub mod chart;
pub mod definition;
pub mod generator;
pub mod repeater;
pub mod separator;
pub mod table;

pub use action::{ActionDefinition, ActionType, ReportAction};
pub use chart::{
    Chart, ChartDataPoint, ChartDataSet, ChartDataSetDefinition, ChartDefinition, ChartGenerator,
    ChartType,
};
pub use definition::{
    ComponentAttributes, ComponentDefinition, ComponentKind, DefinitionError, DefinitionResult,
    RelativeSize,
};
pub use generator::{ComponentGenerator, GeneratorRegistry};
pub use repeater::{Repeater, RepeaterDefinition, RepeaterGenerator, RepeaterItem, RepeaterType};
pub use separator::{Separator, SeparatorDefinition, SeparatorGenerator, SeparatorStyle};
pub use table::{
    ColumnAlignment, ColumnImportance, Table, TableCell, TableColumn, TableColumnDefinition,
    TableDefinition, TableGenerator, TableGrouping, TableRow,
};

use serde::Serialize;
use uuid::Uuid;

/// Identity and layout shared by every generated component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentHeader {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub kind: ComponentKind,
    pub no_data_message: Option<String>,
    pub relative_width: Option<RelativeSize>,
    pub relative_height: Option<RelativeSize>,
}

impl ComponentHeader {
    /// A fresh header (new id) for a component generated from `attributes`.
    pub fn new(attributes: &ComponentAttributes, kind: ComponentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: attributes.name.clone(),
            title: attributes.title.clone(),
            kind,
            no_data_message: attributes.no_data_message.clone(),
            relative_width: attributes.relative_width,
            relative_height: attributes.relative_height,
        }
    }
}

/// The contract every generated component fulfils.
pub trait ReportComponent {
    fn header(&self) -> &ComponentHeader;

    fn id(&self) -> Uuid {
        self.header().id
    }

    fn name(&self) -> &str {
        &self.header().name
    }

    fn title(&self) -> &str {
        &self.header().title
    }

    fn kind(&self) -> ComponentKind {
        self.header().kind
    }

    fn no_data_message(&self) -> Option<&str> {
        self.header().no_data_message.as_deref()
    }

    fn relative_width(&self) -> Option<f64> {
        self.header().relative_width.map(|s| s.get())
    }

    fn relative_height(&self) -> Option<f64> {
        self.header().relative_height.map(|s| s.get())
    }
}

/// A generated component of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Table(Table),
    Repeater(Repeater),
    Chart(Chart),
    Separator(Separator),
}

impl Component {
    fn header_mut(&mut self) -> &mut ComponentHeader {
        match self {
            Component::Table(c) => &mut c.header,
            Component::Repeater(c) => &mut c.header,
            Component::Chart(c) => &mut c.header,
            Component::Separator(c) => &mut c.header,
        }
    }

    /// Use `message` when the definition declared no no-data message.
    pub fn with_default_no_data_message(mut self, message: Option<&str>) -> Self {
        let header = self.header_mut();
        if header.no_data_message.is_none() {
            header.no_data_message = message.map(str::to_string);
        }
        self
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Component::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_repeater(&self) -> Option<&Repeater> {
        match self {
            Component::Repeater(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_chart(&self) -> Option<&Chart> {
        match self {
            Component::Chart(c) => Some(c),
            _ => None,
        }
    }
}

impl ReportComponent for Component {
    fn header(&self) -> &ComponentHeader {
        match self {
            Component::Table(c) => &c.header,
            Component::Repeater(c) => &c.header,
            Component::Chart(c) => &c.header,
            Component::Separator(c) => &c.header,
        }
    }
}
