//! The four `UserService` call shapes.

use std::time::Duration;

use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tonic::Request;

use crate::channel::ChannelExt;
use crate::config::{CallShape, ClientConfig, ExchangeConfig};
use crate::duplex::{drain, DuplexDriver, ExchangeSummary};
use crate::error::Error;
use crate::interceptor::RequestIdInterceptor;
use crate::pb::user_service_client::UserServiceClient;
use crate::pb::{StatusResponse, User};
use crate::report::Reporter;
use crate::samples::{sample_user, sample_users};

type GrpcClient = UserServiceClient<InterceptedService<Channel, RequestIdInterceptor>>;

/// Client for the user service.
///
/// # Example
///
/// ```ignore
/// use user_client::{CallShape, ClientConfig, ConsoleReporter, UserClient};
///
/// let config = ClientConfig::builder().with_dotenv().build()?;
/// let mut client = UserClient::connect(&config).await?;
/// client.run(CallShape::Bidi, ConsoleReporter).await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserClient {
    inner: GrpcClient,
    exchange: ExchangeConfig,
}

impl UserClient {
    /// Connect eagerly to the configured endpoint.
    pub async fn connect(config: &ClientConfig) -> Result<Self, Error> {
        let channel = Channel::connect(&config.channel).await?;
        Ok(Self::new(channel, config.exchange.clone()))
    }

    pub fn new(channel: Channel, exchange: ExchangeConfig) -> Self {
        Self {
            inner: UserServiceClient::with_interceptor(channel, RequestIdInterceptor::new()),
            exchange,
        }
    }

    /// `AddUser`: one request, one response.
    pub async fn add_user<R: Reporter>(
        &mut self,
        user: User,
        reporter: &R,
    ) -> Result<StatusResponse, Error> {
        reporter.sending(&user);
        let response = self
            .inner
            .add_user(Request::new(user))
            .await
            .map_err(Error::Rpc)?
            .into_inner();

        reporter.received(&response);
        Ok(response)
    }

    /// `AddUserVerbose`: one request, then every status the server streams back.
    pub async fn add_user_verbose<R: Reporter>(
        &mut self,
        user: User,
        reporter: &R,
    ) -> Result<ExchangeSummary, Error> {
        reporter.sending(&user);
        let mut responses = self
            .inner
            .add_user_verbose(Request::new(user))
            .await
            .map_err(Error::Rpc)?
            .into_inner();

        let received = drain(&mut responses, reporter).await?;
        Ok(ExchangeSummary { sent: 1, received })
    }

    /// `AddUsers`: stream `users` at the upload interval, then read the
    /// single response once the server has seen them all.
    pub async fn add_users<R: Reporter + Clone>(
        &mut self,
        users: Vec<User>,
        reporter: &R,
    ) -> Result<ExchangeSummary, Error> {
        let sent = users.len();
        let requests = paced(users, self.exchange.upload_interval(), reporter.clone());

        let response = self
            .inner
            .add_users(Request::new(requests))
            .await
            .map_err(Error::Rpc)?
            .into_inner();

        reporter.received(&response);
        Ok(ExchangeSummary { sent, received: 1 })
    }

    /// `AddUserStreamBoth`: both directions at once.
    pub async fn add_user_stream_both<R: Reporter>(
        &mut self,
        users: Vec<User>,
        reporter: R,
    ) -> Result<ExchangeSummary, Error> {
        let mut grpc = self.inner.clone();
        DuplexDriver::from_config(&self.exchange)
            .drive(users, reporter, |requests| async move {
                grpc.add_user_stream_both(Request::new(requests))
                    .await
                    .map(|response| response.into_inner())
            })
            .await
    }

    /// Run one call shape with the sample requests.
    pub async fn run<R: Reporter + Clone>(
        &mut self,
        shape: CallShape,
        reporter: R,
    ) -> Result<ExchangeSummary, Error> {
        tracing::info!(call = %shape, "Starting call");

        let summary = match shape {
            CallShape::Unary => {
                self.add_user(sample_user(), &reporter).await?;
                ExchangeSummary { sent: 1, received: 1 }
            }
            CallShape::ServerStream => self.add_user_verbose(sample_user(), &reporter).await?,
            CallShape::ClientStream => self.add_users(sample_users(), &reporter).await?,
            CallShape::Bidi => self.add_user_stream_both(sample_users(), reporter).await?,
        };

        tracing::info!(
            call = %shape,
            sent = summary.sent,
            received = summary.received,
            "Call finished"
        );
        Ok(summary)
    }
}

/// Yields `users` in order with `interval` between consecutive items.
fn paced<R: Reporter>(
    users: Vec<User>,
    interval: Duration,
    reporter: R,
) -> impl tokio_stream::Stream<Item = User> + Send + 'static {
    async_stream::stream! {
        for (index, user) in users.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(interval).await;
            }
            reporter.sending(&user);
            yield user;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;
    use tokio::time::Instant;
    use tokio_stream::StreamExt;

    #[tokio::test(start_paused = true)]
    async fn paced_stream_keeps_order_and_spacing() {
        let reporter = RecordingReporter::new();
        let interval = Duration::from_secs(3);
        let stream = paced(sample_users(), interval, reporter.clone());
        tokio::pin!(stream);

        let mut stamped = Vec::new();
        while let Some(user) = stream.next().await {
            stamped.push((Instant::now(), user));
        }

        let ids: Vec<_> = stamped.iter().map(|(_, u)| u.id.as_str()).collect();
        assert_eq!(ids, ["leo1", "leo2", "leo3", "leo4", "leo5"]);
        for pair in stamped.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= interval);
        }
        assert_eq!(reporter.requests(), sample_users());
    }

    #[tokio::test(start_paused = true)]
    async fn paced_stream_does_not_wait_after_last_user() {
        let start = Instant::now();
        let stream = paced(sample_users(), Duration::from_secs(1), RecordingReporter::new());
        tokio::pin!(stream);

        while stream.next().await.is_some() {}

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn client_clones_share_channel_config() {
        let config = ClientConfig::default();
        let channel = Channel::connect_lazy(&config.channel).unwrap();

        let client = UserClient::new(channel, config.exchange.clone());
        let copy = client.clone();
        assert_eq!(copy.exchange, config.exchange);
    }
}
