use serde::Serialize;

/// One row of the id-to-level report: the document id and its level value.
///
/// `level` stays a string end to end; the pipeline never interprets it
/// numerically, it only carries the attribute through to the report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LevelRow {
    pub id: String,
    pub level: String,
}

/// One row of the id-to-object report: the owning document id and one
/// object name. A document with N objects contributes N of these.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ObjectRow {
    pub id: String,
    pub name: String,
}

impl LevelRow {
    /// CSV header; must stay aligned with the field declaration order.
    pub const HEADER: [&'static str; 2] = ["id", "level"];
}

impl ObjectRow {
    /// CSV header; must stay aligned with the field declaration order.
    pub const HEADER: [&'static str; 2] = ["id", "name"];
}
