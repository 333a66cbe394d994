pub mod bash;
pub mod tempfile_utils;
