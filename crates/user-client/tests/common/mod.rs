//! In-process `UserService` used as the peer in integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::Stream;
use tonic::transport::Server;
use tonic::{Request, Response, Status, Streaming};

use user_client::pb::user_service_server::{UserService, UserServiceServer};
use user_client::pb::{StatusResponse, User};
use user_client::{ClientConfig, ExchangeConfig, REQUEST_ID_HEADER};

pub const VERBOSE_STATUSES: [&str; 4] = ["Init", "Inserting", "User has been inserted", "Completed"];

type ResponseStream = Pin<Box<dyn Stream<Item = Result<StatusResponse, Status>> + Send>>;

/// Echoes users back and records what it saw.
#[derive(Debug, Clone, Default)]
pub struct EchoUsers {
    /// Abort the bidirectional call after answering this many users.
    pub fail_after: Option<usize>,
    /// End the bidirectional call cleanly after answering this many users.
    pub close_after: Option<usize>,
    pub seen: Arc<Mutex<Vec<User>>>,
    pub request_ids: Arc<Mutex<Vec<String>>>,
}

impl EchoUsers {
    pub fn failing_after(answered: usize) -> Self {
        Self {
            fail_after: Some(answered),
            ..Default::default()
        }
    }

    pub fn closing_after(answered: usize) -> Self {
        Self {
            close_after: Some(answered),
            ..Default::default()
        }
    }

    pub fn seen(&self) -> Vec<User> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_ids(&self) -> Vec<String> {
        self.request_ids.lock().unwrap().clone()
    }

    fn record<T>(&self, request: &Request<T>) {
        let id = request
            .metadata()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.request_ids.lock().unwrap().push(id);
    }
}

fn with_status(status: &str, user: User) -> StatusResponse {
    StatusResponse {
        status: status.to_string(),
        user: Some(user),
    }
}

#[tonic::async_trait]
impl UserService for EchoUsers {
    async fn add_user(&self, request: Request<User>) -> Result<Response<StatusResponse>, Status> {
        self.record(&request);
        let user = request.into_inner();
        self.seen.lock().unwrap().push(user.clone());
        Ok(Response::new(with_status("Created", user)))
    }

    type AddUserVerboseStream = ResponseStream;

    async fn add_user_verbose(
        &self,
        request: Request<User>,
    ) -> Result<Response<Self::AddUserVerboseStream>, Status> {
        self.record(&request);
        let user = request.into_inner();
        self.seen.lock().unwrap().push(user.clone());

        let responses: Vec<_> = VERBOSE_STATUSES
            .iter()
            .map(|status| Ok(with_status(status, user.clone())))
            .collect();
        let stream: ResponseStream = Box::pin(tokio_stream::iter(responses));
        Ok(Response::new(stream))
    }

    async fn add_users(
        &self,
        request: Request<Streaming<User>>,
    ) -> Result<Response<StatusResponse>, Status> {
        self.record(&request);
        let mut inbound = request.into_inner();

        let mut count = 0;
        while let Some(user) = inbound.message().await? {
            self.seen.lock().unwrap().push(user);
            count += 1;
        }

        Ok(Response::new(StatusResponse {
            status: format!("{count} users added"),
            user: None,
        }))
    }

    type AddUserStreamBothStream = ResponseStream;

    async fn add_user_stream_both(
        &self,
        request: Request<Streaming<User>>,
    ) -> Result<Response<Self::AddUserStreamBothStream>, Status> {
        self.record(&request);
        let mut inbound = request.into_inner();
        let seen = Arc::clone(&self.seen);
        let fail_after = self.fail_after;
        let close_after = self.close_after;

        let output = async_stream::stream! {
            let mut answered = 0;
            loop {
                match inbound.message().await {
                    Ok(Some(user)) => {
                        seen.lock().unwrap().push(user.clone());
                        if fail_after == Some(answered) {
                            yield Err(Status::aborted("connection reset by peer"));
                            break;
                        }
                        answered += 1;
                        yield Ok(with_status("Added", user));
                        if close_after == Some(answered) {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(status) => {
                        yield Err(status);
                        break;
                    }
                }
            }
        };

        let stream: ResponseStream = Box::pin(output);
        Ok(Response::new(stream))
    }
}

/// Serve `service` on an ephemeral local port.
pub async fn spawn_server(service: EchoUsers) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(UserServiceServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    addr
}

/// Forward one TCP connection to `upstream` until the returned sender fires,
/// then drop both sockets without any HTTP/2 goodbye.
pub async fn spawn_severable_proxy(upstream: SocketAddr) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (sever, severed) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (mut client, _) = listener.accept().await.unwrap();
        let mut server = TcpStream::connect(upstream).await.unwrap();
        tokio::select! {
            _ = tokio::io::copy_bidirectional(&mut client, &mut server) => {}
            _ = severed => {}
        }
    });

    (addr, sever)
}

/// Client config pointed at `addr` with short pacing.
pub fn client_config(addr: SocketAddr, interval: Duration) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.channel.endpoint = format!("http://{addr}");
    config.channel.connect_timeout_secs = 5;
    config.exchange = ExchangeConfig {
        duplex_interval_ms: interval.as_millis() as u64,
        upload_interval_ms: interval.as_millis() as u64,
        ..Default::default()
    };
    config
}
