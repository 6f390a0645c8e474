pub mod pending_list;
pub mod priority_queue;

pub use pending_list::PendingList;
pub use priority_queue::{HeapEntry, IndexedMinHeap};
