// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Line-oriented message loop

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::{dispatch::Dispatcher, error::BirderResult};

/// Answer every non-empty line of `reader` with one JSON line on `writer`
///
/// Returns the number of messages handled once `reader` is exhausted.
pub async fn run<R, W>(dispatcher: &Dispatcher, reader: R, mut writer: W) -> BirderResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = dispatcher.handle(&line).await;
        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');

        writer.write_all(&encoded).await?;
        writer.flush().await?;

        handled += 1;
        debug!(handled, "Reply written");
    }

    Ok(handled)
}
