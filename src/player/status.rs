use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info};

/// 状态应答通道（ANS_ 行、ID_ 行）
#[derive(Clone)]
pub struct StatusChannel {
    tx: Sender<String>,
}

impl StatusChannel {
    /// 创建通道，返回发送端和接收端
    pub fn new() -> (Self, Receiver<String>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    /// 没有接收方的通道，应答只写日志
    pub fn detached() -> Self {
        Self::new().0
    }

    pub fn emit(&self, line: String) {
        info!("{}", line);
        if self.tx.send(line).is_err() {
            debug!("状态通道无接收方");
        }
    }

    /// ANS_<NAME>=<value>
    pub fn answer(&self, name: &str, value: impl std::fmt::Display) {
        self.emit(format!("ANS_{}={}", name, value));
    }

    /// ANS_<NAME>='<value>'
    pub fn answer_quoted(&self, name: &str, value: &str) {
        self.emit(format!("ANS_{}='{}'", name, value));
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_lines() {
        let (status, rx) = StatusChannel::new();
        status.answer("LENGTH", format!("{:.2}", 12.5));
        status.answer_quoted("FILENAME", "a.mkv");
        assert_eq!(rx.try_recv().unwrap(), "ANS_LENGTH=12.50");
        assert_eq!(rx.try_recv().unwrap(), "ANS_FILENAME='a.mkv'");
    }

    #[test]
    fn test_detached_does_not_fail() {
        let status = StatusChannel::detached();
        status.emit("ID_AUDIO_TRACK=1".to_string());
    }
}
