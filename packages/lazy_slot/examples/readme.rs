//! Example from the package README.

use lazy_slot::LazySlot;

fn main() {
    let slot = LazySlot::new(|| Ok::<_, std::convert::Infallible>("expensive".to_string()));

    // Nothing is constructed yet.
    assert!(slot.try_get().is_none());

    let value = slot.get().unwrap();
    assert_eq!(*value, "expensive");

    // Later accesses return the same shared instance.
    let again = slot.get().unwrap();
    assert!(std::sync::Arc::ptr_eq(&value, &again));

    println!("Constructed once, shared twice.");
}
