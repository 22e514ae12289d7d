pub mod commonjs_host;
pub mod commonjs_umd_utils;
pub mod delegating_host;
pub mod esm2015_host;
pub mod esm5_host;
pub mod umd_host;
pub mod utils;
