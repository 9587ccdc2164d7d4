#![no_main]

use libfuzzer_sys::fuzz_target;
use meridian_transactions::codec;
use meridian_types::Address;

// Sign bytes of any decodable transaction ignore attached signatures.
fuzz_target!(|data: &[u8]| {
    let Some((&sig_len, rest)) = data.split_first() else {
        return;
    };
    let Ok(mut tx) = codec::decode(rest) else {
        return;
    };
    let before = tx.sign_bytes("fuzz").expect("decoded transactions always encode");
    let signers: Vec<Address> = tx.signers();
    for signer in &signers {
        tx.set_signature(signer, vec![0xA5; sig_len as usize]);
    }
    assert_eq!(tx.sign_bytes("fuzz").unwrap(), before);
});
