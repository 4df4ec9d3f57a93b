//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                         |
//! |------------|----------------|-------------------------------------|
//! | `hal_bus`  | BusPort        | any `embedded-hal` I2C controller   |
//! | `indicator`| IndicatorPort  | alarm `OutputPin` + `fmt::Write`    |
//! | `actuator` | ActuatorPort   | `SetDutyCycle` PWM + alarm pin      |
//! | `motor`    | MotorPort      | direction pins + button `InputPin`  |
//! | `log_sink` | EventSink      | `log` facade                        |
//! | `sim`      | BusPort, …     | simulated bus, devices, and slave   |

pub mod actuator;
pub mod hal_bus;
pub mod indicator;
pub mod log_sink;
pub mod motor;
pub mod sim;
