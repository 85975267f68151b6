/// A poisoned lock means another thread panicked while mutating the entry table. There is
/// no meaningful way to continue, so we simply give up via panic.
pub(crate) const ERR_POISONED_LOCK: &str = "poisoned lock - the cache state is unrecoverable";
