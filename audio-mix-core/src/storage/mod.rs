pub mod checksum;
pub mod scratch;
