/// Raw-to-volume composition command.
pub mod compose;
/// Volume-to-layers split command.
pub mod decompose;
/// Buffer information command.
pub mod info;
/// Schema-driven record graph decode command.
pub mod visit;

mod util;
