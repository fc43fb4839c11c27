pub use self::tracker::StateChangeTracker;

pub mod logging;

mod tracker;
