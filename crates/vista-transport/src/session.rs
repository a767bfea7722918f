use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

use vista_config::BrokerConfig;
use vista_types::{InboundMessage, SessionEvent};

use crate::error::{Result, TransportError};

/// 事件通道容量
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// MQTT 传输会话
///
/// 持有一条到 Broker 的连接。入站事件通过单一 mpsc 通道按投递顺序
/// 交给唯一消费者，管道侧因此无需加锁。
///
/// Broker 不保证订阅跨重连存活，已登记的订阅会在每次重连成功后
/// 全部重新下发。断开期间 publish / subscribe 快速失败，不排队。
pub struct MqttSession {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
    stopping: Arc<AtomicBool>,
    /// 已登记的订阅过滤器（重连后重新下发）
    subscriptions: Arc<RwLock<Vec<String>>>,
    /// 事件接收端，由消费者一次性取走
    events: Mutex<Option<mpsc::Receiver<SessionEvent>>>,
}

impl MqttSession {
    /// 连接到 Broker
    ///
    /// 等待首个 CONNACK 后才返回；超时或握手出错返回 `Connect` 错误。
    /// 连接建立后的断线由事件泵按配置的重连间隔自动重试。
    pub async fn connect(config: &BrokerConfig) -> Result<Self> {
        let mut options =
            MqttOptions::new(config.client_id.as_str(), config.host.as_str(), config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
        options.set_clean_session(true);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username.clone(), password.clone());
        }

        let (client, mut eventloop) = AsyncClient::new(options, 10);

        // 等待首个 CONNACK，把初始连接失败同步暴露给调用方
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        loop {
            match tokio::time::timeout(connect_timeout, eventloop.poll()).await {
                Ok(Ok(Event::Incoming(Packet::ConnAck(_)))) => break,
                Ok(Ok(_)) => continue,
                Ok(Err(e)) => return Err(TransportError::Connect(e.to_string())),
                Err(_) => {
                    return Err(TransportError::Connect(format!(
                        "connection to {}:{} timed out",
                        config.host, config.port
                    )))
                }
            }
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let connected = Arc::new(AtomicBool::new(true));
        let stopping = Arc::new(AtomicBool::new(false));
        let subscriptions = Arc::new(RwLock::new(Vec::new()));

        // 握手已完成，先补一个 Connected 事件
        let _ = tx.try_send(SessionEvent::Connected);

        tokio::spawn(Self::run_event_pump(
            eventloop,
            client.clone(),
            tx,
            connected.clone(),
            stopping.clone(),
            subscriptions.clone(),
            Duration::from_secs(config.reconnect_secs),
        ));

        info!(
            broker = %format!("{}:{}", config.host, config.port),
            client_id = %config.client_id,
            "MQTT session connected"
        );

        Ok(Self {
            client,
            connected,
            stopping,
            subscriptions,
            events: Mutex::new(Some(rx)),
        })
    }

    /// 取走事件接收端
    ///
    /// 只能取一次；单一消费者是管道免锁的前提。
    pub fn take_events(&self) -> Option<mpsc::Receiver<SessionEvent>> {
        self.events.lock().expect("events lock poisoned").take()
    }

    /// 当前是否连接
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// 订阅主题过滤器
    ///
    /// 过滤器支持 `+` 单层通配。订阅被登记，重连后自动恢复。
    pub async fn subscribe(&self, filter: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }

        self.client
            .subscribe(filter, QoS::AtLeastOnce)
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        let mut subs = self.subscriptions.write().await;
        if !subs.iter().any(|f| f == filter) {
            subs.push(filter.to_string());
        }

        info!(filter = %filter, "Subscribed");
        Ok(())
    }

    /// 取消订阅
    pub async fn unsubscribe(&self, filter: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }

        self.client
            .unsubscribe(filter)
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        self.subscriptions.write().await.retain(|f| f != filter);

        info!(filter = %filter, "Unsubscribed");
        Ok(())
    }

    /// 发布消息
    pub async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }

        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))?;

        debug!(topic = %topic, "Message published");
        Ok(())
    }

    /// 断开连接并停止事件投递
    pub async fn disconnect(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);

        if let Err(e) = self.client.disconnect().await {
            debug!(error = %e, "Disconnect request failed");
        }

        info!("MQTT session disconnected");
    }

    /// 事件泵
    ///
    /// 把 rumqttc 的事件流收敛为 `SessionEvent` 并保序投递。连接出错时
    /// 上报 Disconnected + Error，休眠一个重连间隔后继续轮询（rumqttc
    /// 在下一次轮询时自动重拨）。
    async fn run_event_pump(
        mut eventloop: EventLoop,
        client: AsyncClient,
        events: mpsc::Sender<SessionEvent>,
        connected: Arc<AtomicBool>,
        stopping: Arc<AtomicBool>,
        subscriptions: Arc<RwLock<Vec<String>>>,
        reconnect_period: Duration,
    ) {
        loop {
            if stopping.load(Ordering::SeqCst) {
                break;
            }

            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    connected.store(true, Ordering::SeqCst);

                    // 重连成功：恢复全部已登记的订阅
                    let filters = subscriptions.read().await.clone();
                    for filter in &filters {
                        if let Err(e) = client.subscribe(filter.as_str(), QoS::AtLeastOnce).await {
                            warn!(filter = %filter, error = %e, "Failed to restore subscription");
                        }
                    }

                    info!(restored = filters.len(), "MQTT session reconnected");
                    if events.send(SessionEvent::Connected).await.is_err() {
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let message = InboundMessage::new(publish.topic, publish.payload);
                    debug!(
                        topic = %message.topic,
                        bytes = message.payload.len(),
                        "Message received"
                    );
                    if events.send(SessionEvent::Message(message)).await.is_err() {
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    connected.store(false, Ordering::SeqCst);
                    if events.send(SessionEvent::Disconnected).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    let was_connected = connected.swap(false, Ordering::SeqCst);
                    if stopping.load(Ordering::SeqCst) {
                        break;
                    }

                    if was_connected && events.send(SessionEvent::Disconnected).await.is_err() {
                        break;
                    }
                    if events.send(SessionEvent::Error(e.to_string())).await.is_err() {
                        break;
                    }

                    error!(error = %e, "MQTT connection error, retrying");
                    tokio::time::sleep(reconnect_period).await;
                }
            }
        }

        debug!("Event pump stopped");
    }

    /// 创建一个未连接的会话（仅用于测试快速失败路径）
    #[cfg(test)]
    fn disconnected_for_tests() -> Self {
        let options = MqttOptions::new("vista-test", "localhost", 1883);
        let (client, _eventloop) = AsyncClient::new(options, 10);
        let (_tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            client,
            connected: Arc::new(AtomicBool::new(false)),
            stopping: Arc::new(AtomicBool::new(false)),
            subscriptions: Arc::new(RwLock::new(Vec::new())),
            events: Mutex::new(Some(rx)),
        }
    }
}
