//! Tick-based animation frame selection.

use crate::resource_pack::AnimationMeta;
use crate::types::BlockTransform;

/// Mutable state for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub rotation_x: i32,
    pub rotation_y: i32,
    /// Tick currently being drawn.
    pub current_tick: u32,
    /// Number of ticks needed to play every animated face once. At least 1.
    pub max_ticks: u32,
}

impl RenderContext {
    pub fn new(transform: BlockTransform) -> Self {
        Self {
            rotation_x: transform.x,
            rotation_y: transform.y,
            current_tick: 0,
            max_ticks: 1,
        }
    }

    pub fn transform(&self) -> BlockTransform {
        BlockTransform::new(self.rotation_x, self.rotation_y)
    }

    pub fn is_first_tick(&self) -> bool {
        self.current_tick == 0
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(BlockTransform::default())
    }
}

/// Playback parameters of an animated texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceAnimation {
    pub frame_count: u32,
    /// Ticks per frame, at least 1.
    pub frametime: u32,
}

impl FaceAnimation {
    pub fn new(meta: &AnimationMeta, frame_count: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            frametime: meta.frametime.max(1),
        }
    }

    /// Ticks for one full loop, saturating at `u32::MAX`.
    pub fn duration(&self) -> u32 {
        self.frame_count.saturating_mul(self.frametime)
    }

    /// First tick after `tick` that shows a different frame.
    pub fn next_change(&self, tick: u32) -> u32 {
        (tick / self.frametime)
            .saturating_add(1)
            .saturating_mul(self.frametime)
    }

    /// Frame to show at the context's tick.
    ///
    /// On tick 0 this also grows `ctx.max_ticks` to cover this animation.
    pub fn frame_at(&self, ctx: &mut RenderContext) -> u32 {
        if ctx.is_first_tick() {
            ctx.max_ticks = ctx.max_ticks.max(self.duration());
            return 0;
        }
        (ctx.current_tick / self.frametime) % self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation(frametime: u32, frame_count: u32) -> FaceAnimation {
        let meta = AnimationMeta {
            frametime,
            ..AnimationMeta::default()
        };
        FaceAnimation::new(&meta, frame_count)
    }

    #[test]
    fn test_first_tick_sets_max_ticks() {
        let anim = animation(2, 3);
        let mut ctx = RenderContext::default();
        assert_eq!(ctx.max_ticks, 1);
        assert_eq!(anim.frame_at(&mut ctx), 0);
        assert_eq!(ctx.max_ticks, 6);
    }

    #[test]
    fn test_max_ticks_keeps_longest() {
        let mut ctx = RenderContext::default();
        animation(2, 3).frame_at(&mut ctx);
        animation(1, 4).frame_at(&mut ctx);
        assert_eq!(ctx.max_ticks, 6);
    }

    #[test]
    fn test_later_ticks() {
        let anim = animation(2, 3);
        let mut ctx = RenderContext::default();
        anim.frame_at(&mut ctx);

        let frames: Vec<u32> = (1..8)
            .map(|tick| {
                ctx.current_tick = tick;
                anim.frame_at(&mut ctx)
            })
            .collect();
        assert_eq!(frames, vec![0, 1, 1, 2, 2, 0, 0]);
        // Only tick 0 touches max_ticks.
        assert_eq!(ctx.max_ticks, 6);
    }

    #[test]
    fn test_huge_frametime_saturates() {
        let anim = animation(u32::MAX, 2);
        let mut ctx = RenderContext::default();
        assert_eq!(anim.frame_at(&mut ctx), 0);
        assert_eq!(ctx.max_ticks, u32::MAX);
        assert_eq!(anim.next_change(0), u32::MAX);
    }

    #[test]
    fn test_next_change() {
        let anim = animation(3, 4);
        assert_eq!(anim.next_change(0), 3);
        assert_eq!(anim.next_change(2), 3);
        assert_eq!(anim.next_change(3), 6);
    }

    #[test]
    fn test_context_from_transform() {
        let ctx = RenderContext::new(BlockTransform::new(90, 180));
        assert_eq!(ctx.rotation_x, 90);
        assert_eq!(ctx.rotation_y, 180);
        assert_eq!(ctx.transform(), BlockTransform::new(90, 180));
    }
}
