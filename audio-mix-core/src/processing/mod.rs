pub mod filter_graph;
pub mod media_sniff;
pub mod wav_format;
