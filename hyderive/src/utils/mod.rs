/// Force-once cells backing deferred child slots.
pub mod lazy;
