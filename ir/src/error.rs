use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Greedy rewriting kept making progress past the round cap.
    #[snafu(display("fixed-point rewrite did not converge in function `{func}` after {rounds} rounds"))]
    FixedPointDivergence { func: String, rounds: usize },
}
