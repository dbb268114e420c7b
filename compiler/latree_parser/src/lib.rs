//! Tree builder for latree.
//!
//! Turns formula text such as `\left(a-b\right)\times\left(a+b\right)=a^2-b^2`
//! into a [`latree_ast::Node`] in one left-to-right pass, using the tree under
//! construction as its own parse stack.

pub mod parser;

pub use parser::{build, build_with, BuilderConfig, EqualPrecedence, ParseError, TreeBuilder};

#[cfg(test)]
mod tests {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize the logger for tests
    pub fn init_test_logger() {
        INIT.call_once(|| {
            Builder::new()
                .filter_level(LevelFilter::Debug)
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "[{}] {}: {}",
                        record.level(),
                        record.target(),
                        record.args()
                    )
                })
                .is_test(true)
                .init();
            log::info!("Test logger initialized");
        });
    }
}

#[cfg(test)]
pub(crate) use tests::init_test_logger;
