//! Row types as SQLite returns them. Conversion into the shared models
//! happens above this crate.

pub struct TraitRow {
    pub id: String,
    pub text: String,
    pub is_approved: bool,
    pub red_flag: i64,
    pub green_flag: i64,
    pub neutral: i64,
    pub created_at: String,
}
