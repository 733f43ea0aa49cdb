// Reporting logic services layer
//
// Pure functions over the normalized tables. Nothing in here touches the
// terminal or the filesystem, so the same aggregates feed the text, JSON, CSV
// and Excel outputs.

pub mod aggregation;
