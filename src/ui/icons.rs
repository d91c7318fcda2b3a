pub struct Icons;

impl Icons {
    pub const STUDENT: &str = "🎓";
    pub const TEACHER: &str = "👤";
    pub const SECTION: &str = "📚";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const UNLINK: &str = "✂️";
    pub const DEL: &str = "🗑️";
    pub const EMPTY: &str = "∅";
}
