pub mod check_combine;
pub mod check_inputs;
pub mod check_pivot_longer;
pub mod check_scale;
pub mod check_summarize;
pub mod compare;
