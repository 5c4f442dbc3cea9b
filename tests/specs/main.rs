//! Behavioral specs for the `sj` binary.
//!
//! Each spec runs the built binary against a throwaway state directory with
//! a shell script standing in for rsync.

mod prelude;

mod cli {
    mod help;
    mod list;
}

mod job {
    mod locks;
    mod start;
    mod validate;
}
