// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account login.

use md5::{Digest, Md5};

use crate::error::{DecodeError, Result};
use crate::protocol::{CloudClient, Session};
use crate::response::{LoginResult, decode_account};

/// Returns the lowercase hex MD5 digest the login endpoint expects.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Md5::digest(password.as_bytes()))
}

/// Logs in and stores the session on `client`.
pub(crate) async fn login(client: &CloudClient, email: &str, password: &str) -> Result<Session> {
    let envelope = client.builder().login(email, &hash_password(password));
    let body = client.send(&envelope).await?;
    let result: LoginResult = decode_account(&body)?;
    if result.token.is_empty() {
        return Err(DecodeError::MissingField("token".to_string()).into());
    }

    let session = Session {
        token: result.token,
        account_id: result.account_id,
        country_code: result.country_code,
    };
    client.set_session(session.clone());
    Ok(session)
}
