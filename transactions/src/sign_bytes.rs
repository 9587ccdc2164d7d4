//! Signing pre-images.
//!
//! Sign bytes wrap the chain id and the unsigned transaction in the shape of
//! a legacy Ethereum transaction so that existing hardware wallets can
//! display and sign them:
//!
//! ```text
//! [nonce=0, gas_price=0, gas=0, to=<20 zero bytes>, value=0, data]
//! data = string(chain_id) ++ encode(tx with every signature cleared)
//! ```

use meridian_types::ADDRESS_LEN;

use crate::codec::encode_body;
use crate::error::EncodeError;
use crate::rlp;
use crate::TxBody;

/// Wrap already-encoded transaction bytes in the signing envelope.
pub fn signing_envelope(chain_id: &str, tx_bytes: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(chain_id.len() + tx_bytes.len() + 9);
    rlp::append_str(&mut data, chain_id);
    data.extend_from_slice(tx_bytes);

    let mut out = Vec::with_capacity(data.len() + 32);
    rlp::append_list(&mut out, |p| {
        rlp::append_u64(p, 0);
        rlp::append_u64(p, 0);
        rlp::append_u64(p, 0);
        rlp::append_bytes(p, &[0u8; ADDRESS_LEN]);
        rlp::append_u64(p, 0);
        rlp::append_bytes(p, &data);
    });
    out
}

/// Envelope over `body` exactly as given. Callers clear signatures first.
pub(crate) fn sign_bytes_for<T: TxBody>(chain_id: &str, body: &T) -> Result<Vec<u8>, EncodeError> {
    let tx_bytes = encode_body(body)?;
    Ok(signing_envelope(chain_id, &tx_bytes))
}
