//! Report generation module.
//!
//! Turns computed audit artifacts into their consumable forms: the markdown
//! report, SVG charts, CSV tables and the JSON summary.

mod charts;
mod markdown;
mod summary;
mod tables;

pub use charts::{ChartRenderer, RenderedChart};
pub use markdown::{LOW_N_SUBGROUP, ReportAssembler, ReportInputs, markdown_table};
pub use summary::SummaryParts;
pub use tables::{ToFrame, frame_to_csv};
