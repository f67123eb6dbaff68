//! Reports: definitions, orchestration and the generated result.

mod definition;
mod generated;
mod generator;
mod result;
mod section;

pub use definition::{ReportDefinition, SectionDefinition, SectionType};
pub use generated::Report;
pub use generator::ReportGenerator;
pub use result::{GenerationOutcome, ReportGenerationResult, ReportSectionGenerationResult};
pub use section::ReportSection;
