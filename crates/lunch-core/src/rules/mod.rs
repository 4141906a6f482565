pub mod validation;

pub use validation::{
    format_date, parse_date, validate_meal_patch, validate_name, validate_new_meal,
    validate_new_student, validate_price, validate_quantity, validate_student_patch,
};
