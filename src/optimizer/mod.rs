pub mod acceptance;
pub mod configuration;
pub mod context;
pub mod mutation;
pub mod runner;

pub use self::acceptance::{
    AcceptanceRule, AcceptanceTable, Verdict, DEFAULT_TABLE_SIZE, MAX_TABLE_SIZE,
};
pub use self::configuration::Configuration;
pub use self::context::{SearchContext, StepOutcome};
pub use self::mutation::{
    LotTransfer, Move, MoveGenerator, PairSwap, PointMove, PointMutation, ReversalMove,
    SegmentReversal, SwapMove, TransferMove,
};
pub use self::runner::{
    AnnealOutcome, Annealer, AnnealerOptions, Incumbent, Progress, ProgressCallback,
    ReportSchedule, StopPolicy, Termination,
};
