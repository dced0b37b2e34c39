mod clause;
mod clause_allocator;

pub use clause::Clause;
pub use clause::Provenance;
pub use clause_allocator::ClauseAllocator;
pub use clause_allocator::ClauseReference;
