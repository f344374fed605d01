/*
 * src/signs.rs
 * 標識の種類と、組み込みのサンプル標識データ
 */

/// 標識の種類 (アプリ固定の初期リスト)
pub const SIGN_TYPES: &[&str] = &["Warning", "Regulatory", "Guide", "School", "Work Zone"];

/// 組み込みの標識
#[derive(Copy, Clone)]
pub struct BuiltinSign {
    pub sign_type: &'static str, // 種類 ("Work Zone" など)
    pub file_name: &'static str, // ファイル名 ("Work_Zone-Flagger_Ahead.gif" など)
}

/// アセットディレクトリが指定されなかったときに使う標識リスト (種類順)
pub const BUILTIN_SIGNS: &[BuiltinSign] = &[
    // Warning
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Curve_Ahead.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Deer_Crossing.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Divided_Highway.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Hill.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Merge.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Narrow_Bridge.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Railroad_Crossing.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Slippery_When_Wet.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Stop_Ahead.gif" },
    BuiltinSign { sign_type: "Warning", file_name: "Warning-Two_Way_Traffic.gif" },

    // Regulatory
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-Do_Not_Enter.gif" },
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-No_Left_Turn.gif" },
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-No_U_Turn.gif" },
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-One_Way.gif" },
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-Speed_Limit.gif" },
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-Stop.gif" },
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-Wrong_Way.gif" },
    BuiltinSign { sign_type: "Regulatory", file_name: "Regulatory-Yield.gif" },

    // Guide
    BuiltinSign { sign_type: "Guide", file_name: "Guide-Airport.gif" },
    BuiltinSign { sign_type: "Guide", file_name: "Guide-Camping.gif" },
    BuiltinSign { sign_type: "Guide", file_name: "Guide-Gas_Station.gif" },
    BuiltinSign { sign_type: "Guide", file_name: "Guide-Hospital.gif" },
    BuiltinSign { sign_type: "Guide", file_name: "Guide-Interstate_Route.gif" },
    BuiltinSign { sign_type: "Guide", file_name: "Guide-Rest_Area.gif" },

    // School
    BuiltinSign { sign_type: "School", file_name: "School-School_Bus_Stop_Ahead.gif" },
    BuiltinSign { sign_type: "School", file_name: "School-School_Crossing.gif" },
    BuiltinSign { sign_type: "School", file_name: "School-School_Speed_Limit.gif" },

    // Work Zone
    BuiltinSign { sign_type: "Work Zone", file_name: "Work_Zone-Detour.gif" },
    BuiltinSign { sign_type: "Work Zone", file_name: "Work_Zone-Flagger_Ahead.gif" },
    BuiltinSign { sign_type: "Work Zone", file_name: "Work_Zone-Road_Work_Ahead.gif" },
    BuiltinSign { sign_type: "Work Zone", file_name: "Work_Zone-Shoulder_Closed.gif" },
];
