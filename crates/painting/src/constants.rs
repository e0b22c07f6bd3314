/// Stamp spacing along a segment, as a fraction of the brush radius.
pub const SEGMENT_STEP_FACTOR: f32 = 0.6;

/// Interpolated samples per segment when smoothing a finished stroke.
pub const SMOOTHING_SAMPLES_PER_SEGMENT: usize = 10;

/// Dots stamped by one sprinkle burst.
pub const SCATTER_DOT_COUNT: usize = 22;

/// Sprinkle spread radius, as a multiple of the brush size.
pub const SCATTER_SPREAD_FACTOR: f32 = 1.4;

/// Smallest and largest sprinkle dot radius in pixels (inclusive).
pub const SCATTER_DOT_RADIUS_MIN: u32 = 2;
pub const SCATTER_DOT_RADIUS_MAX: u32 = 4;

/// Default seed for the sprinkle generator.
pub const DEFAULT_SCATTER_SEED: u64 = 0x5eed_cafe;

/// Side height of a tier: `max(MIN_SIDE_HEIGHT, r * SIDE_HEIGHT_FACTOR)`.
pub const MIN_SIDE_HEIGHT: f32 = 28.0;
pub const SIDE_HEIGHT_FACTOR: f32 = 0.48;

/// Vertical radius of a tier's top ellipse: `r * TOP_RY_FACTOR`.
pub const TOP_RY_FACTOR: f32 = 0.18;

/// Gap between the bottom tier and the bottom edge of the canvas.
pub const STACK_FLOOR_MARGIN: f32 = 70.0;

/// How far each tier sinks into the one below it.
pub const STACK_OVERLAP: f32 = 6.0;

/// How long a toast notification stays visible, in seconds.
pub const TOAST_SECONDS: f32 = 2.0;
