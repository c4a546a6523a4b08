pub mod documents;
#[cfg(test)]
pub mod memory;
pub mod mongodb;
