//! Report filters: parameter values, sorting and grouping rules.
//!
//! A filter is built mutably by the caller, then shared read-only by every
//! generation task of a report. Parameter values are looked up in this order:
//!
//! 1. a value scoped to the section and query
//! 2. a value scoped to the query alone
//! 3. the component definition's default for the parameter
//! 4. the default declared by the query parameter
//!
//! A parameter with none of these is omitted.

use serde::{Deserialize, Serialize};

use crate::data::parameter::find_value;
use crate::data::{same_name, GroupingRule, ParameterValue, Query, SortingRule, Value};
use crate::report::SectionType;

/// A parameter value supplied by the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParameter {
    /// Restrict the value to one section; `None` applies to every section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionType>,
    pub query: String,
    pub name: String,
    pub value: Value,
}

impl FilterParameter {
    fn matches(&self, section: Option<SectionType>, query: &str, name: &str) -> bool {
        self.section == section && same_name(&self.query, query) && same_name(&self.name, name)
    }
}

/// A sorting rule targeting one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSortingRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionType>,
    pub component: String,
    #[serde(flatten)]
    pub rule: SortingRule,
}

/// A grouping rule targeting one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroupingRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionType>,
    pub component: String,
    #[serde(flatten)]
    pub rule: GroupingRule,
}

fn targets(rule_section: Option<SectionType>, rule_component: &str, section: SectionType, component: &str) -> bool {
    rule_section.map_or(true, |s| s == section) && same_name(rule_component, component)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub parameters: Vec<FilterParameter>,
    #[serde(default)]
    pub sorting: Vec<FilterSortingRule>,
    #[serde(default)]
    pub grouping: Vec<FilterGroupingRule>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    fn upsert(&mut self, section: Option<SectionType>, query: &str, name: &str, value: Value) {
        match self
            .parameters
            .iter_mut()
            .find(|p| p.matches(section, query, name))
        {
            Some(existing) => existing.value = value,
            None => self.parameters.push(FilterParameter {
                section,
                query: query.to_string(),
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Set a parameter value for `query` within one section.
    pub fn set_parameter(
        &mut self,
        section: SectionType,
        query: &str,
        name: &str,
        value: impl Into<Value>,
    ) {
        self.upsert(Some(section), query, name, value.into());
    }

    /// Set a parameter value for `query` in every section.
    pub fn set_query_parameter(&mut self, query: &str, name: &str, value: impl Into<Value>) {
        self.upsert(None, query, name, value.into());
    }

    pub fn with_parameter(
        mut self,
        section: SectionType,
        query: &str,
        name: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.set_parameter(section, query, name, value);
        self
    }

    pub fn with_query_parameter(mut self, query: &str, name: &str, value: impl Into<Value>) -> Self {
        self.set_query_parameter(query, name, value);
        self
    }

    /// Append a sorting rule for a component. Rules apply in insertion order.
    pub fn add_sorting_rule(&mut self, section: Option<SectionType>, component: &str, rule: SortingRule) {
        self.sorting.push(FilterSortingRule {
            section,
            component: component.to_string(),
            rule,
        });
    }

    pub fn with_sorting_rule(mut self, section: Option<SectionType>, component: &str, rule: SortingRule) -> Self {
        self.add_sorting_rule(section, component, rule);
        self
    }

    pub fn add_grouping_rule(&mut self, section: Option<SectionType>, component: &str, rule: GroupingRule) {
        self.grouping.push(FilterGroupingRule {
            section,
            component: component.to_string(),
            rule,
        });
    }

    pub fn with_grouping_rule(mut self, section: Option<SectionType>, component: &str, rule: GroupingRule) -> Self {
        self.add_grouping_rule(section, component, rule);
        self
    }

    fn lookup(&self, section: Option<SectionType>, query: &str, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.matches(section, query, name))
            .map(|p| &p.value)
    }

    /// Filter-supplied values for the parameters `query` declares.
    ///
    /// Section-scoped values win over query-scoped ones. Defaults are not
    /// consulted.
    pub fn get_parameters(&self, section: SectionType, query: &dyn Query) -> Vec<ParameterValue> {
        query
            .parameters()
            .iter()
            .filter_map(|info| {
                self.lookup(Some(section), query.name(), &info.name)
                    .or_else(|| self.lookup(None, query.name(), &info.name))
                    .map(|value| ParameterValue::new(info.name.clone(), value.clone()))
            })
            .collect()
    }

    /// Query-scoped values for `query`, falling back to `defaults`.
    pub fn get_query_parameters(&self, query: &dyn Query, defaults: &[ParameterValue]) -> Vec<ParameterValue> {
        query
            .parameters()
            .iter()
            .filter_map(|info| {
                self.lookup(None, query.name(), &info.name)
                    .cloned()
                    .or_else(|| find_value(defaults, &info.name).map(|d| d.value.clone()))
                    .map(|value| ParameterValue::new(info.name.clone(), value))
            })
            .collect()
    }

    /// Every declared parameter of `query` resolved through the full chain.
    pub fn resolve_parameters(
        &self,
        section: SectionType,
        query: &dyn Query,
        defaults: &[ParameterValue],
    ) -> Vec<ParameterValue> {
        query
            .parameters()
            .iter()
            .filter_map(|info| {
                self.lookup(Some(section), query.name(), &info.name)
                    .or_else(|| self.lookup(None, query.name(), &info.name))
                    .cloned()
                    .or_else(|| find_value(defaults, &info.name).map(|d| d.value.clone()))
                    .or_else(|| info.default_value.clone())
                    .map(|value| ParameterValue::new(info.name.clone(), value))
            })
            .collect()
    }

    pub fn get_sorting_rules(&self, section: SectionType, component: &str) -> Vec<SortingRule> {
        self.sorting
            .iter()
            .filter(|r| targets(r.section, &r.component, section, component))
            .map(|r| r.rule.clone())
            .collect()
    }

    pub fn get_grouping_rules(&self, section: SectionType, component: &str) -> Vec<GroupingRule> {
        self.grouping
            .iter()
            .filter(|r| targets(r.section, &r.component, section, component))
            .map(|r| r.rule.clone())
            .collect()
    }
}
