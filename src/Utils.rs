//! utility modules used by the function layer and the binary
/// terminal logger initialisation
pub mod logger;
/// parse task documents with structure like "title\n key1: value1, value2\n key2: value3" into HashMap
pub mod task_parser;
