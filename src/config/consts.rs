/// Default per-scratchpad capacity in bytes (SMV-class accelerator pads)
pub const DEFAULT_SPM_CAPACITY: u64 = 32 * 1024;
/// Default scratchpad count: two input pads plus one output pad
pub const DEFAULT_SPM_COUNT: usize = 3;
/// Scratchpad count the slot layout and the in-process mapper are built for
pub const SUPPORTED_SPM_COUNT: usize = 3;
/// Operator-name prefixes that denote host-side (CPU) operators
pub const HOST_OP_PREFIXES: &[&str] = &["reorder", "data"];
