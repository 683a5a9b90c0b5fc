//! Arena and controller constants, in game units (uu, uu/s, seconds, radians).

// Physics
pub const GRAVITY_Z: f32 = -650.0;
pub const HALF_GRAVITY: f32 = 325.0;
pub const BALL_RADIUS: f32 = 92.75;
pub const CAR_NEUTRAL_Z: f32 = 17.0;

// Bounce detection
pub const BOUNCE_GUARD_SAMPLES: usize = 10;
pub const FREE_FALL_ACCEL_MIN: f32 = -680.0; // exclusive
pub const FREE_FALL_ACCEL_MAX: f32 = -600.0; // exclusive

// Ground driving
pub const MAX_GROUND_SPEED: f32 = 1410.0; // throttle-only top speed
pub const MAX_BOOST_SPEED: f32 = 2300.0;
pub const REVERSE_MAX_HEIGHT: f32 = 120.0;
pub const SPEED_GAP_ACCELERATE: f32 = 200.0;
pub const SPEED_GAP_COAST: f32 = -50.0;
pub const BOOST_ALIGNMENT_RAD: f32 = 0.2;
pub const STEER_GAIN: f32 = 3.0;

// Dodge
pub const DODGE_TRIGGER_DISTANCE: f32 = 300.0;
pub const DODGE_TRIGGER_SPEED: f32 = 1000.0;
pub const DODGE_MAX_BALL_HEIGHT: f32 = 400.0;
pub const DODGE_ARMING_DELAY_S: f32 = 0.1;
pub const DODGE_MAX_EXECUTION_S: f32 = 1.0;

// Ground-to-air jump
pub const JUMP_HOLD_S: f32 = 0.215;
pub const DOUBLE_JUMP_START_S: f32 = 0.25;
pub const DOUBLE_JUMP_END_S: f32 = 0.27;
pub const DOUBLE_JUMP_MIN_HEIGHT: f32 = 560.0;
pub const AERIAL_BOOST_MAX_ERROR_RAD: f32 = 0.9;
pub const AERIAL_ARRIVAL_DISTANCE: f32 = 25.0;
pub const AERIAL_MIN_REMAINING_S: f32 = -2.0;
pub const AERIAL_MAX_REMAINING_S: f32 = 10.0;
pub const AERIAL_COAST_AFTER_S: f32 = -1.9; // past this, stop chasing the intercept
pub const AERIAL_ETA_DIVISOR: f32 = 529.165;

// Air attitude
pub const ATTITUDE_GAIN: f32 = 35.0;
pub const ATTITUDE_DIVISOR: f32 = 20.0;
pub const ATTITUDE_RATE_DAMPING: f32 = 5.0;
pub const RECOVERY_GAIN: f32 = -0.7;
