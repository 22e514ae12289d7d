pub mod src;

pub use src::commonjs_host::CommonJsReflectionHost;
pub use src::delegating_host::DelegatingReflectionHost;
pub use src::esm2015_host::Esm2015ReflectionHost;
pub use src::esm5_host::Esm5ReflectionHost;
pub use src::umd_host::UmdReflectionHost;

#[cfg(test)]
mod test;
