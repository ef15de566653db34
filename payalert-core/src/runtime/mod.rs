mod memory;
mod state;


pub use memory::MemorySnapshot;
pub use state::AppState;
