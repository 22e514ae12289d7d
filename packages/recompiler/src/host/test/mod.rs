mod esm5_host_spec;
mod util;
