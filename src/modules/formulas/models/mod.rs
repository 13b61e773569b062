mod field;

pub use field::{
    FieldDefinition, FieldDiagnostic, FieldType, FieldValue, FieldValues, Resolution,
};
