//! Streaming file body
//!
//! Reads a file in fixed-size chunks. The first chunk can be read before the
//! response head is committed (`prime`), so an early failure still gets a clean
//! 500. A failure after that appends the read error marker and then ends the
//! body with an error, which makes hyper abort the message instead of closing
//! it cleanly.

use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::StreamExt;
use hyper::body::{Body, Bytes, Frame};
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::http::response::READ_ERROR_BODY;
use crate::logger;

enum State {
    Streaming,
    Failed(Option<io::Error>),
    Done,
}

pub struct FileBody<R = File> {
    path: PathBuf,
    first: Option<Bytes>,
    chunks: ReaderStream<R>,
    state: State,
}

impl<R: AsyncRead + Unpin> FileBody<R> {
    pub fn new(reader: R, path: PathBuf, chunk_size: usize) -> Self {
        Self {
            path,
            first: None,
            chunks: ReaderStream::with_capacity(reader, chunk_size.max(1)),
            state: State::Streaming,
        }
    }

    /// Read the first chunk ahead of the response head.
    pub async fn prime(&mut self) -> io::Result<()> {
        match self.chunks.next().await {
            Some(Ok(chunk)) => {
                self.first = Some(chunk);
                Ok(())
            }
            Some(Err(e)) => {
                self.state = State::Done;
                Err(e)
            }
            None => {
                self.state = State::Done;
                Ok(())
            }
        }
    }
}

impl<R: AsyncRead + Unpin> Body for FileBody<R> {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, io::Error>>> {
        let this = self.get_mut();

        if let Some(chunk) = this.first.take() {
            return Poll::Ready(Some(Ok(Frame::data(chunk))));
        }

        match &mut this.state {
            State::Streaming => match this.chunks.poll_next_unpin(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(Frame::data(chunk)))),
                Poll::Ready(Some(Err(e))) => {
                    logger::log_error(&format!(
                        "Read error while streaming '{}': {e}",
                        this.path.display()
                    ));
                    this.state = State::Failed(Some(e));
                    Poll::Ready(Some(Ok(Frame::data(Bytes::from_static(
                        READ_ERROR_BODY.as_bytes(),
                    )))))
                }
                Poll::Ready(None) => {
                    this.state = State::Done;
                    Poll::Ready(None)
                }
            },
            State::Failed(err) => {
                let err = err.take();
                this.state = State::Done;
                Poll::Ready(err.map(Err))
            }
            State::Done => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        self.first.is_none() && matches!(self.state, State::Done)
    }
}
