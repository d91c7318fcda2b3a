pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    dim, error, header, info, linked, not_found, saved, section, success, summary_row, unlinked,
    warn,
};
pub use table::{TableBuilder, sections_table, stats_table, students_table, teachers_table};
pub use theme::{theme, Theme};
