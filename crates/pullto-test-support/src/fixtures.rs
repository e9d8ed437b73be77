//! C# sample sources shared by unit, service and CLI tests
//!
//! Line numbers quoted below are zero-based.

/// `MyClass<TType> : BaseClass, IMyClass, IMyTypedClass<string>`
///
/// - 9: private field
/// - 10: `MyProperty` auto property
/// - 11: `MyPropertyLamda` expression-bodied property
/// - 12: `FullProperty` block property
/// - 17: `FullPropertyAlt` block property with accessor bodies
/// - 28: `GetNewIdAsync` wrapped generic method (body ends on 42)
/// - 43: protected `Reset` method
pub const MY_CLASS: &str = include_str!("../fixtures/Sample/MyClass.cs");

/// `IMyClass`, already declaring `GetNewIdAsync` and `FullProperty`
pub const I_MY_CLASS: &str = include_str!("../fixtures/Sample/SampleProject/IMyClass.cs");

/// `BaseClass : IBaseClass` with expression-bodied methods
pub const BASE_CLASS: &str = include_str!("../fixtures/Sample/SampleProject/BaseClass.cs");

/// File-scoped namespace interface with an empty body
pub const I_BASE_CLASS: &str = include_str!("../fixtures/Sample/SampleProject/IBaseClass.cs");

pub const MY_PROPERTY_LINE: usize = 10;
pub const MY_PROPERTY_LAMBDA_LINE: usize = 11;
pub const FULL_PROPERTY_LINE: usize = 12;
pub const GET_NEW_ID_LINE: usize = 28;
pub const GET_NEW_ID_BODY_LINE: usize = 33;
pub const RESET_LINE: usize = 43;

/// Interface with one member, as found in an untouched project
pub const INTERFACE_FILE: &str = "using System;
using System.Collections.Generic;
using System.Linq;
using System.Threading.Tasks;

namespace Sample
{
    public interface IMyClass
    {
      string MyOtherItem { get; set; }
    }
}
";

/// Relative path and contents of every sample source file
pub fn sample_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("MyClass.cs", MY_CLASS),
        ("SampleProject/IMyClass.cs", I_MY_CLASS),
        ("SampleProject/BaseClass.cs", BASE_CLASS),
        ("SampleProject/IBaseClass.cs", I_BASE_CLASS),
    ]
}
