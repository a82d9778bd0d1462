#![no_main]

use libfuzzer_sys::fuzz_target;
use pinpad_core::PinSequence;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the slot count (1-16)
    let max_length = (data[0] % 16) as usize + 1;
    let raw = String::from_utf8_lossy(&data[1..]);

    let sequence = PinSequence::new(max_length).unwrap().accept(&raw);

    assert!(sequence.len() <= max_length);
    assert!(sequence.digits().chars().all(|c| c.is_ascii_digit()));

    // Accepting the accepted digits again changes nothing
    let again = sequence.accept(sequence.digits());
    assert_eq!(again.digits(), sequence.digits());

    let slots = sequence.slots(true);
    assert_eq!(slots.len(), max_length);
    assert!(slots.iter().filter(|s| s.active).count() <= 1);
    assert_eq!(slots.iter().filter(|s| s.filled).count(), sequence.len());
});
