use crate::api::{ApiError, ApiHandler, ApiRequest, ApiResponse};
use async_trait::async_trait;
use http::header;
use pingora::prelude::{HttpPeer, ProxyHttp, Session};
use pingora::{Custom, Error};
use pingora_http::ResponseHeader;

/// Terminal gateway: every request is answered locally by the API handler
/// and nothing is ever proxied upstream.
pub struct AlertGateway {
    handler: ApiHandler,
}

impl AlertGateway {
    pub fn new(handler: ApiHandler) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl ProxyHttp for AlertGateway {
    type CTX = ();

    fn new_ctx(&self) -> Self::CTX {}

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> pingora::Result<Box<HttpPeer>> {
        // request_filter answers every request.
        Err(Error::new(Custom(
            "AlertGateway attempted to proxy upstream (bug)",
        )))
    }

    async fn request_filter(
        &self,
        session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> pingora::Result<bool> {
        let req_header = session.req_header();
        let method = req_header.method.clone();
        let path = req_header.uri.path().to_owned();
        let query = req_header.uri.query().map(str::to_owned);

        let resp = match read_body(session).await {
            Ok(body) => {
                let req = ApiRequest {
                    method,
                    path,
                    query,
                    body,
                };
                self.handler.respond(&req).await
            }
            Err(err) => self.handler.fallback(&path, &err),
        };

        write_response(session, resp).await?;
        Ok(true)
    }
}

async fn read_body(session: &mut Session) -> Result<Vec<u8>, ApiError> {
    let mut body = Vec::new();

    while let Some(chunk) = session
        .read_request_body()
        .await
        .map_err(|e| ApiError::Body(e.to_string()))?
    {
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

async fn write_response(session: &mut Session, resp: ApiResponse) -> pingora::Result<()> {
    let mut resp_header = ResponseHeader::build(resp.status, None)?;
    resp_header.insert_header(header::CONTENT_TYPE, resp.content_type)?;
    resp_header.insert_header(header::CONTENT_LENGTH, resp.body.len().to_string())?;

    session
        .write_response_header(Box::new(resp_header), false)
        .await?;
    session
        .write_response_body(Some(resp.body.into()), true)
        .await?;

    Ok(())
}
