use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The rewrite driver failed to converge; the module is invalid.
    #[snafu(display("runtime-call lowering failed: {source}"))]
    Lowering { source: sable_ir::Error },
}
