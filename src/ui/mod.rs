/// Presentation layer: panels, charts, and summary tables.
///
/// Stateless with respect to computation: everything rendered here is a
/// direct mapping of the filtered view and its aggregates onto egui
/// widgets and plot primitives.
pub mod charts;
pub mod panels;
pub mod summary;
