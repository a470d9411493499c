// ==========================================
// 产品生产追踪系统 - 多媒体控制能力
// ==========================================
// 播放/停止/上一首/下一首，仅输出可读消息，不接入真实播放引擎
// ==========================================

use crate::domain::product::Product;

// ==========================================
// Trait: MultimediaControl
// ==========================================
pub trait MultimediaControl {
    /// 开始播放
    fn play(&self) -> String;

    /// 停止播放
    fn stop(&self) -> String;

    /// 上一个媒体
    fn previous(&self) -> String;

    /// 下一个媒体
    fn next(&self) -> String;
}

/// 音频播放器视图
///
/// 借用一个音频播放器产品，不持有所有权
#[derive(Debug, Clone, Copy)]
pub struct AudioPlayer<'a> {
    product: &'a Product,
}

impl AudioPlayer<'_> {
    fn announce(&self, message: String) -> String {
        tracing::info!(product_id = self.product.id(), "{}", message);
        message
    }
}

impl Product {
    /// 以音频播放器视图访问（非音频播放器返回 None）
    pub fn as_audio_player(&self) -> Option<AudioPlayer<'_>> {
        if self.is_audio_player() {
            Some(AudioPlayer { product: self })
        } else {
            None
        }
    }
}

impl MultimediaControl for AudioPlayer<'_> {
    fn play(&self) -> String {
        self.announce(format!("{} is playing.", self.product.name()))
    }

    fn stop(&self) -> String {
        self.announce(format!("{} has stopped playing.", self.product.name()))
    }

    fn previous(&self) -> String {
        self.announce(format!(
            "{} is playing the previous media.",
            self.product.name()
        ))
    }

    fn next(&self) -> String {
        self.announce(format!("{} is playing the next media.", self.product.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ItemType;

    #[test]
    fn test_audio_player_messages() {
        let p = Product::audio_player_default("iPod", "Apple").unwrap();
        let player = p.as_audio_player().unwrap();
        assert_eq!(player.play(), "iPod is playing.");
        assert_eq!(player.stop(), "iPod has stopped playing.");
        assert_eq!(player.previous(), "iPod is playing the previous media.");
        assert_eq!(player.next(), "iPod is playing the next media.");
    }

    #[test]
    fn test_generic_product_is_not_a_player() {
        let p = Product::new("SoundBlaster", "Acme", ItemType::Audio).unwrap();
        assert!(p.as_audio_player().is_none());
    }
}
