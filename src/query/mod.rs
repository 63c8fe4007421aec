pub mod copy;
pub mod output;
pub mod priority;
pub mod rollup;
