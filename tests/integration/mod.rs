//! Integration tests for the relsync binary

mod test_check;
mod test_cut;
