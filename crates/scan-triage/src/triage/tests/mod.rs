mod common;
mod enrichment;
mod service;
