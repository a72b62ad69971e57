use md5::{Digest, Md5};

/// Computes the `api_sig` value for a Last.fm request.
///
/// Parameters are sorted by key (byte-wise, not locale aware), concatenated as
/// `<key><value>` with no separators, the shared secret is appended and the
/// result is MD5-hashed into 32 lowercase hex characters.
///
/// Input order does not matter, so parameters may come from a `HashMap` as
/// well as a `BTreeMap`. Keys are expected to be unique. This function signs
/// exactly what it is given: stripping `format` is the caller's job.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use lfmcli::lastfm::signature::sign;
///
/// let params = BTreeMap::from([("method", "auth.getToken"), ("api_key", "K")]);
/// let sig = sign(&params, "secret");
/// assert_eq!(sig.len(), 32);
/// ```
pub fn sign<I, K, V>(params: I, secret: &str) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries: Vec<(K, V)> = params.into_iter().collect();
    entries.sort_by(|a, b| a.0.as_ref().as_bytes().cmp(b.0.as_ref().as_bytes()));

    let mut payload = String::new();
    for (key, value) in &entries {
        payload.push_str(key.as_ref());
        payload.push_str(value.as_ref());
    }
    payload.push_str(secret);

    md5_hex(&payload)
}

fn md5_hex(input: &str) -> String {
    let digest = Md5::digest(input.as_bytes());
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_md5_hex_known_values() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("secret"), "5ebe2294ecd0e0f08eab7690d2a6ee69");
    }

    #[test]
    fn test_sign_sorts_keys() {
        let params = HashMap::from([
            ("token".to_string(), "T".to_string()),
            ("method".to_string(), "auth.getSession".to_string()),
            ("api_key".to_string(), "K".to_string()),
        ]);
        assert_eq!(
            sign(&params, "s3cr3t"),
            md5_hex("api_keyKmethodauth.getSessiontokenTs3cr3t")
        );
    }

    #[test]
    fn test_sign_uses_bytewise_ordering() {
        // Uppercase sorts before lowercase byte-wise.
        let params = [("b", "2"), ("B", "1"), ("a", "3")];
        assert_eq!(sign(params, ""), md5_hex("B1a3b2"));
    }
}
