use async_trait::async_trait;

use super::{compute_totals, group_rows, sort_rows, Table, TableCell, TableColumn, TableDefinition, TableRow};
use crate::components::definition::{ComponentDefinition, ComponentKind};
use crate::components::generator::{execute_query, ComponentGenerator};
use crate::components::{Component, ComponentHeader};
use crate::data::QueryRow;
use crate::error::{GenerationError, GenerationResult};
use crate::filter::ReportFilter;
use crate::report::SectionType;

/// Generates [`Table`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableGenerator;

impl TableGenerator {
    fn build_row(
        definition: &TableDefinition,
        columns: &[TableColumn],
        row: &QueryRow,
    ) -> GenerationResult<TableRow> {
        let cells = definition
            .columns
            .iter()
            .zip(columns)
            .map(|(column_def, column)| {
                let value = column_def.binding.resolve(row)?;
                let action = column_def
                    .cell_action
                    .as_ref()
                    .map(|a| a.resolve(row))
                    .transpose()?;
                Ok(TableCell::new(column.clone(), value).with_action(action))
            })
            .collect::<GenerationResult<Vec<_>>>()?;

        let action = definition
            .row_action
            .as_ref()
            .map(|a| a.resolve(row))
            .transpose()?;

        Ok(TableRow::new(cells).with_action(action))
    }
}

#[async_trait]
impl ComponentGenerator for TableGenerator {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Table
    }

    async fn generate(
        &self,
        definition: &ComponentDefinition,
        section: SectionType,
        filter: &ReportFilter,
    ) -> GenerationResult<Component> {
        let table = definition
            .as_table()
            .ok_or_else(|| GenerationError::invalid_definition(ComponentKind::Table, definition.kind()))?;

        let parameters = filter.resolve_parameters(section, table.query.as_ref(), &table.default_parameter_values);
        let results = execute_query(table.query.as_ref(), &parameters).await?;

        let columns: Vec<TableColumn> = table.columns.iter().map(|c| c.to_column()).collect();

        let mut rows = results
            .iter()
            .map(|row| Self::build_row(table, &columns, row))
            .collect::<GenerationResult<Vec<_>>>()?;

        if !table.disable_sorting {
            let rules = filter.get_sorting_rules(section, &table.attributes.name);
            rows = sort_rows(rows, &rules)?;
        }

        let functions = table.total_functions();
        let grouping_rules = filter.get_grouping_rules(section, &table.attributes.name);
        let groupings = group_rows(&rows, &columns, &grouping_rules, &functions)?;
        let totals = compute_totals(&columns, &functions, &rows);

        let header = ComponentHeader::new(&table.attributes, ComponentKind::Table);
        let generated = Table::new(header, columns, rows)?
            .with_totals(totals)
            .with_groupings(groupings);

        Ok(Component::Table(generated))
    }
}
